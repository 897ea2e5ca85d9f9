// # ipboard-core
//
// Core library for the IP-address table client.
//
// ## Architecture Overview
//
// This library is the state/sync core behind a paginated, inline-editable
// table of IP-address records:
// - **TableStore**: Single source of truth for the displayed page
// - **PageNavigator**: Paginated fetching with disable-while-loading
// - **RowEditor**: Per-row edit state machine with diff-based updates
// - **DeleteConfirm**: The one shared delete-confirmation slot
// - **TableEngine**: Composition root wiring the above to the collaborators
//
// ## Design Principles
//
// 1. **Single Source of Truth**: Every record lives in the store exactly once
// 2. **Diff-Based Updates**: Only changed fields ever travel to the server
// 3. **Disable, Don't Queue**: In-flight work disables controls; requests
//    that cannot start are dropped, never queued
// 4. **Library-First**: The core renders nothing and performs no I/O; the
//    embedder supplies `RecordApi` and `SessionService` and consumes events

pub mod config;
pub mod confirm;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod events;
pub mod model;
pub mod page;
pub mod row;
pub mod session;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{MAX_ITEMS_PER_PAGE, TableConfig};
pub use confirm::DeleteConfirm;
pub use credentials::{FileCredentialStore, MemoryCredentialStore};
pub use engine::TableEngine;
pub use error::{Error, RejectionCode, Result};
pub use events::TableEvent;
pub use model::{
    IpRecord, RecordDraft, RecordPage, RecordPatch, UserRef, can_delete_record, can_edit_record,
};
pub use page::{PageNavigator, PaginationView};
pub use row::{RowEditor, RowMode, RowView};
pub use session::MemorySession;
pub use store::{PageState, TableStore};
pub use traits::{CredentialStore, Credentials, RecordApi, SessionService};
