// # Credential Store Trait
//
// Defines the interface for token persistence.
//
// ## Purpose
//
// The session collaborator holds an access/refresh token pair. Where that
// pair lives (memory, a file, a platform keyring) is an implementation
// detail behind this trait.
//
// ## Implementations
//
// - In-memory: [`crate::credentials::MemoryCredentialStore`]
// - JSON file with atomic writes: [`crate::credentials::FileCredentialStore`]

use async_trait::async_trait;

/// A stored token pair
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Credentials {
    /// Short-lived bearer token attached to every API request
    pub access_token: String,
    /// Long-lived token used by the auth boundary to mint new access tokens
    pub refresh_token: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Trait for credential store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the stored credentials
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Credentials))`: a credential pair is stored
    /// - `Ok(None)`: logged out (nothing stored)
    /// - `Err(Error)`: storage error
    async fn load(&self) -> Result<Option<Credentials>, crate::Error>;

    /// Store a credential pair, replacing any previous one
    async fn store(&self, credentials: &Credentials) -> Result<(), crate::Error>;

    /// Remove the stored credentials
    ///
    /// Must be idempotent: clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), crate::Error>;
}
