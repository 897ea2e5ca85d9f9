//! Credential store implementations
//!
//! - [`MemoryCredentialStore`]: process-lifetime only, for tests and
//!   short-lived tools
//! - [`FileCredentialStore`]: JSON file with atomic writes, the CLI default

mod file;
mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;
