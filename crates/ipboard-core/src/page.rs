// # Page Navigator
//
// Drives paginated fetching of the record table.
//
// ## Request discipline
//
// At most one fetch is in flight at a time, and none while a row save or
// delete is mid-flight. There is no queue and no retry: a request that
// cannot start right now is silently dropped, exactly like a click on a
// disabled button.
//
// ## Failure policy
//
// Any fetch failure invalidates the session: credentials are cleared once,
// `SessionInvalidated` is emitted, and the pagination controls stay
// disabled until the embedder rebuilds the table after re-login.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::events::{self, TableEvent};
use crate::store::TableStore;
use crate::traits::record_api::RecordApi;
use crate::traits::session::SessionService;

/// What the pagination controls should show right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    /// Zero-based current page
    pub page_number: u32,
    /// Total pages derived from the item count
    pub page_count: u32,
    /// The previous-page button is hidden on the first page
    pub prev_visible: bool,
    /// The next-page button is hidden on the last page
    pub next_visible: bool,
    /// Both buttons are disabled while a fetch is in flight
    pub buttons_enabled: bool,
}

/// Pagination controller over the shared table store
pub struct PageNavigator {
    api: Arc<dyn RecordApi>,
    session: Arc<dyn SessionService>,
    store: Arc<TableStore>,
    events: mpsc::Sender<TableEvent>,
    items_per_page: u32,
    loading: AtomicBool,
    /// Row saves and deletes currently in flight, shared with every row
    /// editor. Navigation is refused while it is non-zero.
    row_ops: Arc<AtomicUsize>,
}

impl PageNavigator {
    pub(crate) fn new(
        api: Arc<dyn RecordApi>,
        session: Arc<dyn SessionService>,
        store: Arc<TableStore>,
        events: mpsc::Sender<TableEvent>,
        items_per_page: u32,
    ) -> Self {
        Self {
            api,
            session,
            store,
            events,
            items_per_page,
            loading: AtomicBool::new(false),
            row_ops: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn row_ops(&self) -> Arc<AtomicUsize> {
        self.row_ops.clone()
    }

    /// Request the next page
    pub async fn next_page(&self) {
        let current = self.store.snapshot().await.page_number;
        self.request_page(current + 1).await;
    }

    /// Request the previous page
    pub async fn prev_page(&self) {
        let current = self.store.snapshot().await.page_number;
        if current > 0 {
            self.request_page(current - 1).await;
        }
    }

    /// Request a page by number
    ///
    /// Silently a no-op when a fetch or any row operation is in flight, or
    /// when `page_number` is out of bounds. Before the first successful
    /// load only page 0 is accepted (the bootstrap fetch).
    pub async fn request_page(&self, page_number: u32) {
        if self.row_ops.load(Ordering::SeqCst) > 0 {
            debug!(page_number, "Ignoring page request: row operation in flight");
            return;
        }

        if self
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!(page_number, "Ignoring page request: fetch already in flight");
            return;
        }

        let state = self.store.snapshot().await;
        let accepted = if state.loaded {
            page_number < state.page_count()
        } else {
            page_number == 0
        };
        if !accepted {
            debug!(
                page_number,
                page_count = state.page_count(),
                "Ignoring out-of-bounds page request"
            );
            self.loading.store(false, Ordering::SeqCst);
            return;
        }

        events::emit(&self.events, TableEvent::ScrollToAnchor);
        self.store.clear_records().await;

        debug!(page_number, items_per_page = self.items_per_page, "Fetching page");
        match self.api.fetch_page(self.items_per_page, page_number).await {
            Ok(page) => {
                if page.page_number != page_number {
                    debug!(
                        requested = page_number,
                        served = page.page_number,
                        "Server clamped the requested page"
                    );
                }
                let served = page.page_number;
                let count = page.count;
                self.store.replace(page).await;
                self.loading.store(false, Ordering::SeqCst);
                events::emit(
                    &self.events,
                    TableEvent::PageLoaded {
                        page_number: served,
                        count,
                    },
                );
            }
            Err(e) => {
                // The loading flag is intentionally left set: the table is
                // unusable until the embedder re-authenticates and rebuilds.
                warn!(error = %e, page_number, "Page fetch failed, invalidating session");
                if let Err(clear_err) = self.session.clear_credentials().await {
                    warn!(error = %clear_err, "Failed to clear credentials");
                }
                events::emit(&self.events, TableEvent::SessionInvalidated);
            }
        }
    }

    /// The current state of the pagination controls
    pub async fn pagination(&self) -> PaginationView {
        let state = self.store.snapshot().await;
        PaginationView {
            page_number: state.page_number,
            page_count: state.page_count(),
            prev_visible: !state.is_first_page(),
            next_visible: !state.is_last_page(),
            buttons_enabled: !self.loading.load(Ordering::SeqCst),
        }
    }
}
