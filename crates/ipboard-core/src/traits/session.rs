// # Session Service Trait
//
// Identity and credential lifetime, injected rather than ambient.
//
// One credential set, readable and clearable from anywhere that holds this
// trait. The "force navigation to login" effect is not part of this trait: the
// core emits `TableEvent::SessionInvalidated` and the embedder navigates.

use async_trait::async_trait;

use crate::model::UserRef;

/// Trait for the session collaborator
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// The identity snapshot for the current session
    ///
    /// Immutable for the session's lifetime; row capabilities are derived
    /// from it once per row mount.
    fn current_user(&self) -> UserRef;

    /// Discard the stored credentials
    ///
    /// Called exactly once per failed page fetch, before the embedder is
    /// told to navigate to the login boundary. Must be idempotent.
    async fn clear_credentials(&self) -> Result<(), crate::Error>;
}
