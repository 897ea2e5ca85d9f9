//! Session service implementation
//!
//! [`MemorySession`] pairs an immutable identity snapshot with a credential
//! store. Authentication itself (login, token refresh) happens outside this
//! crate; the core only ever reads the identity and clears the credentials.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Error;
use crate::model::UserRef;
use crate::traits::credential_store::CredentialStore;
use crate::traits::session::SessionService;

/// Session service over a fixed user and an injected credential store
pub struct MemorySession {
    user: UserRef,
    credentials: Arc<dyn CredentialStore>,
}

impl MemorySession {
    /// Create a session for `user`, clearing through `credentials`
    pub fn new(user: UserRef, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { user, credentials }
    }
}

#[async_trait]
impl SessionService for MemorySession {
    fn current_user(&self) -> UserRef {
        self.user.clone()
    }

    async fn clear_credentials(&self) -> Result<(), Error> {
        self.credentials.clear().await
    }
}
