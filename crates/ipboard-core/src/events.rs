//! Events produced upward by the table core
//!
//! The core never renders anything; it reports what happened on a bounded
//! channel and the embedder (a UI layer, the CLI, or a test) reacts.
//! Sending never blocks a state transition: when the channel is full the
//! event is dropped with a warning.

use tokio::sync::mpsc;
use tracing::warn;

/// Events emitted by the table core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// A page request was accepted; the view should scroll the table
    /// anchor back into sight
    ScrollToAnchor,

    /// A page fetch completed and the store was replaced wholesale
    PageLoaded {
        /// The page number the server served
        page_number: u32,
        /// Number of records in the page
        count: usize,
    },

    /// A page fetch failed; credentials were cleared and the embedder
    /// must navigate to the login boundary
    SessionInvalidated,

    /// A row edit was committed to the shared store
    RowEdited { id: i64 },

    /// A row deletion succeeded and the record left the shared store
    RowDeleted { id: i64 },
}

/// Emit an event without blocking
///
/// Dropping under backpressure is acceptable: the store itself is the
/// source of truth and subscribers can always re-read a snapshot.
pub(crate) fn emit(tx: &mpsc::Sender<TableEvent>, event: TableEvent) {
    if tx.try_send(event).is_err() {
        warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
    }
}
