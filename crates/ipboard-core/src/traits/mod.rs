//! Collaborator traits for the table core
//!
//! These are the narrow interfaces through which the core talks to the rest
//! of the application:
//!
//! - [`RecordApi`]: fetch/update/delete records via the remote service
//! - [`SessionService`]: identity and credential clearing
//! - [`CredentialStore`]: token persistence behind the session

pub mod credential_store;
pub mod record_api;
pub mod session;

pub use credential_store::{CredentialStore, Credentials};
pub use record_api::RecordApi;
pub use session::SessionService;
