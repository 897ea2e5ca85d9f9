// # Table Store
//
// The single source of truth for the currently displayed page.
//
// ## Ownership
//
// - The page navigator replaces the whole page after a fetch
// - A row editor patches exactly one record after a successful edit
// - A successful deletion removes one record and reconciles the counts
//
// No other component holds a second copy of a record; views subscribe and
// re-read snapshots instead.
//
// ## Subscriptions
//
// Every mutation publishes a fresh `PageState` snapshot on a watch channel.
// `updates()` wraps the receiver in a stream so renderers can `.next()`
// their way through state changes without polling.

use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use tokio_stream::Stream;
use tokio_stream::wrappers::WatchStream;

use crate::model::{IpRecord, RecordDraft, RecordPage};

/// The displayed page plus its pagination metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    /// Records of the current page, in server order
    pub ips: Vec<IpRecord>,
    /// Zero-based page number (the server's value, not the requested one)
    pub page_number: u32,
    /// The shared pagination constant
    pub items_per_page: u32,
    /// Total records across all pages
    pub num_total_items: u64,
    /// Records in the current page per the server
    pub count: usize,
    /// False until the first successful fetch
    pub loaded: bool,
}

impl PageState {
    fn empty(items_per_page: u32) -> Self {
        Self {
            ips: Vec::new(),
            page_number: 0,
            items_per_page,
            num_total_items: 0,
            count: 0,
            loaded: false,
        }
    }

    /// Number of pages derived from the total item count
    pub fn page_count(&self) -> u32 {
        self.num_total_items.div_ceil(self.items_per_page as u64) as u32
    }

    /// True on page 0
    pub fn is_first_page(&self) -> bool {
        self.page_number == 0
    }

    /// True on the final page (and before anything has loaded)
    pub fn is_last_page(&self) -> bool {
        self.page_number + 1 >= self.page_count()
    }
}

/// Shared, observable page state
#[derive(Debug)]
pub struct TableStore {
    inner: Arc<RwLock<PageState>>,
    updates_tx: watch::Sender<PageState>,
}

impl TableStore {
    /// Create an empty store for the given page size
    pub fn new(items_per_page: u32) -> Self {
        let initial = PageState::empty(items_per_page);
        let (updates_tx, _) = watch::channel(initial.clone());
        Self {
            inner: Arc::new(RwLock::new(initial)),
            updates_tx,
        }
    }

    /// A point-in-time copy of the page state
    pub async fn snapshot(&self) -> PageState {
        self.inner.read().await.clone()
    }

    /// Current page count (see [`PageState::page_count`])
    pub async fn page_count(&self) -> u32 {
        self.inner.read().await.page_count()
    }

    /// True once any page has loaded successfully
    pub async fn has_loaded(&self) -> bool {
        self.inner.read().await.loaded
    }

    /// Replace the page wholesale from a fetch response
    ///
    /// Every field comes from the server, including `page_number`. The
    /// requested number is deliberately not kept, so server-side clamping
    /// wins.
    pub async fn replace(&self, page: RecordPage) {
        let mut state = self.inner.write().await;
        state.num_total_items = page.num_total_items;
        state.count = page.count;
        state.page_number = page.page_number;
        state.ips = page.ips;
        state.loaded = true;
        self.publish(&state);
    }

    /// Empty the displayed records without touching pagination metadata
    ///
    /// Called when a fetch starts so stale rows are never shown under a
    /// new page number.
    pub async fn clear_records(&self) {
        let mut state = self.inner.write().await;
        state.ips.clear();
        self.publish(&state);
    }

    /// Patch one record in place after a successful edit
    ///
    /// Addressed by id: if the record already left the page (a late
    /// completion after a page change), this is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if a record was patched
    pub async fn patch_record(&self, id: i64, values: &RecordDraft) -> bool {
        let mut state = self.inner.write().await;
        let Some(record) = state.ips.iter_mut().find(|r| r.id == id) else {
            return false;
        };

        record.ip_address = values.ip_address.clone();
        record.label = values.label.clone();
        record.comment = values.comment.clone();
        self.publish(&state);
        true
    }

    /// Remove one record and reconcile the counts
    ///
    /// The page is not re-fetched; the view simply loses the row. The total
    /// item count and the in-page count both shrink by one so page-count
    /// math stays aligned with the server.
    ///
    /// # Returns
    ///
    /// `true` if a record was removed
    pub async fn remove_record(&self, id: i64) -> bool {
        let mut state = self.inner.write().await;
        let before = state.ips.len();
        state.ips.retain(|r| r.id != id);
        if state.ips.len() == before {
            return false;
        }

        state.num_total_items = state.num_total_items.saturating_sub(1);
        state.count = state.count.saturating_sub(1);
        self.publish(&state);
        true
    }

    /// Subscribe to page-state snapshots
    pub fn subscribe(&self) -> watch::Receiver<PageState> {
        self.updates_tx.subscribe()
    }

    /// Page-state snapshots as a stream
    ///
    /// Yields the current state immediately, then one snapshot per
    /// mutation (coalesced under load, which is fine: each item is a full
    /// snapshot, not a delta).
    pub fn updates(&self) -> Pin<Box<dyn Stream<Item = PageState> + Send + 'static>> {
        Box::pin(WatchStream::new(self.updates_tx.subscribe()))
    }

    fn publish(&self, state: &PageState) {
        self.updates_tx.send_replace(state.clone());
    }
}
