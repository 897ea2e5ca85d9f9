// # Memory Credential Store
//
// In-memory implementation of CredentialStore.
//
// ## Purpose
//
// Holds the token pair for the lifetime of the process only. Useful for
// tests and for tools that receive a token via the environment and never
// need to persist it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::credential_store::{CredentialStore, Credentials};

/// In-memory credential store implementation
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    inner: Arc<RwLock<Option<Credentials>>>,
}

impl MemoryCredentialStore {
    /// Create an empty (logged-out) store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a credential pair
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(credentials))),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<Credentials>, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn store(&self, credentials: &Credentials) -> Result<(), Error> {
        *self.inner.write().await = Some(credentials.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        *self.inner.write().await = None;
        Ok(())
    }
}
