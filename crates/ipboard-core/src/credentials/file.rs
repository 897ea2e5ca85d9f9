// # File Credential Store
//
// File-based implementation of CredentialStore.
//
// ## Purpose
//
// Persists the token pair across CLI invocations.
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "credentials": {
//     "access_token": "...",
//     "refresh_token": "..."
//   }
// }
// ```
//
// Writes are atomic (write to a temp file, then rename). A file that fails
// to parse is treated as logged-out with a warning rather than an error:
// a corrupt token file and a missing one both mean "go log in again".

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::credential_store::{CredentialStore, Credentials};

/// Credential file format version, for future migration
const CREDENTIAL_FILE_VERSION: &str = "1.0";

/// Serializable credential file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct CredentialFileFormat {
    version: String,
    credentials: Option<Credentials>,
}

/// File-based credential store with atomic writes
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by the given path
    ///
    /// Creates the parent directory if needed; the file itself is only
    /// created on the first `store`.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::credentials(format!(
                    "Failed to create credential directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self { path })
    }

    /// Write the credential file atomically
    async fn write_file(&self, credentials: Option<&Credentials>) -> Result<(), Error> {
        let format = CredentialFileFormat {
            version: CREDENTIAL_FILE_VERSION.to_string(),
            credentials: credentials.cloned(),
        };

        let json = serde_json::to_string_pretty(&format)
            .map_err(|e| Error::credentials(format!("Failed to serialize credentials: {}", e)))?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::credentials(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::credentials(format!(
                    "Failed to write temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::credentials(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::credentials(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Credentials written to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<Credentials>, Error> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::credentials(format!(
                "Failed to read credential file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        match serde_json::from_str::<CredentialFileFormat>(&content) {
            Ok(format) => {
                if format.version != CREDENTIAL_FILE_VERSION {
                    tracing::warn!(
                        "Credential file version mismatch: expected {}, got {}. Loading anyway.",
                        CREDENTIAL_FILE_VERSION,
                        format.version
                    );
                }
                Ok(format.credentials)
            }
            Err(e) => {
                tracing::warn!(
                    "Credential file {} is unreadable ({}); treating as logged out",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn store(&self, credentials: &Credentials) -> Result<(), Error> {
        self.write_file(Some(credentials)).await
    }

    async fn clear(&self) -> Result<(), Error> {
        if !self.path.exists() {
            return Ok(());
        }

        fs::remove_file(&self.path).await.map_err(|e| {
            Error::credentials(format!(
                "Failed to remove credential file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}
