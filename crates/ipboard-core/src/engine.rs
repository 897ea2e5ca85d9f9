// # Table Engine
//
// Composition root for the table core. Owns the shared store, the page
// navigator and the confirmation slot, and mounts row editors on demand.
// All collaborators arrive as trait objects; the engine itself performs
// no I/O.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::config::TableConfig;
use crate::confirm::DeleteConfirm;
use crate::events::TableEvent;
use crate::model::UserRef;
use crate::page::PageNavigator;
use crate::row::RowEditor;
use crate::store::TableStore;
use crate::traits::record_api::RecordApi;
use crate::traits::session::SessionService;

/// The assembled table core
pub struct TableEngine {
    api: Arc<dyn RecordApi>,
    session: Arc<dyn SessionService>,
    store: Arc<TableStore>,
    pages: Arc<PageNavigator>,
    confirm: Arc<DeleteConfirm>,
    events: mpsc::Sender<TableEvent>,
}

impl TableEngine {
    /// Assemble the engine
    ///
    /// Returns the engine and the receiving end of the event channel. The
    /// embedder drives the engine through its accessors and reacts to the
    /// events; the first thing to do is usually `pages().request_page(0)`.
    pub fn new(
        api: Arc<dyn RecordApi>,
        session: Arc<dyn SessionService>,
        config: TableConfig,
    ) -> Result<(Self, mpsc::Receiver<TableEvent>), crate::Error> {
        config.validate()?;

        let (events, events_rx) = mpsc::channel(config.event_channel_capacity);
        let store = Arc::new(TableStore::new(config.items_per_page));
        let pages = Arc::new(PageNavigator::new(
            api.clone(),
            session.clone(),
            store.clone(),
            events.clone(),
            config.items_per_page,
        ));
        let confirm = Arc::new(DeleteConfirm::new());

        info!(
            items_per_page = config.items_per_page,
            user = %session.current_user().username,
            "Table engine assembled"
        );

        Ok((
            Self {
                api,
                session,
                store,
                pages,
                confirm,
                events,
            },
            events_rx,
        ))
    }

    /// The shared table store
    pub fn store(&self) -> &Arc<TableStore> {
        &self.store
    }

    /// The pagination controller
    pub fn pages(&self) -> &Arc<PageNavigator> {
        &self.pages
    }

    /// The shared delete-confirmation slot
    pub fn confirm(&self) -> &Arc<DeleteConfirm> {
        &self.confirm
    }

    /// The session user the engine was assembled for
    pub fn current_user(&self) -> UserRef {
        self.session.current_user()
    }

    /// Mount a row editor for a record currently on the displayed page
    ///
    /// Returns `None` if the record is not on the page (it may have been
    /// deleted or paged away since the caller last looked).
    pub async fn editor(&self, record_id: i64) -> Option<Arc<RowEditor>> {
        let snapshot = self.store.snapshot().await;
        let record = snapshot.ips.iter().find(|r| r.id == record_id)?;
        Some(Arc::new(RowEditor::new(
            record,
            self.session.current_user(),
            self.api.clone(),
            self.store.clone(),
            self.confirm.clone(),
            self.events.clone(),
            self.pages.row_ops(),
        )))
    }
}
