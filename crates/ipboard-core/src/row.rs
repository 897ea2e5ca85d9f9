// # Row Editor
//
// Per-row edit state machine: Viewing/Editing mode, draft inputs, field
// error messages, and the save/delete flows.
//
// ## Save flow
//
// Saving always starts by clearing field errors and disabling the row's
// controls. The effective values (draft where present, committed
// otherwise) are then checked client-side (ip address and label must be
// non-blank) and diffed against the committed values. An empty diff is
// the no-op edit that doubles as cancel: back to Viewing, no network
// call. A non-empty diff goes to the server as a partial update; on
// rejection the known codes map to field messages and the row stays in
// Editing with every entered value intact.
//
// ## Delete flow
//
// A row never deletes itself directly. `request_delete` hands a snapshot
// and a handle to this row to the shared confirmation slot; only a
// confirmation on that slot calls back into `execute_delete`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use crate::confirm::{DeleteConfirm, PendingDeletion};
use crate::events::{self, TableEvent};
use crate::model::{IpRecord, RecordDraft, UserRef, can_delete_record, can_edit_record};
use crate::store::TableStore;
use crate::traits::record_api::RecordApi;

/// Field message for a blank IP address
pub const IP_ADDRESS_REQUIRED: &str = "IP address is required.";
/// Field message for a blank label
pub const LABEL_REQUIRED: &str = "Label is required.";
/// Field message for the `invalid_ip_address` rejection
pub const IP_ADDRESS_INVALID: &str = "Invalid IP address.";
/// Field message for the `unavailable_label` rejection
pub const LABEL_UNAVAILABLE: &str = "Label is already used.";

/// Display mode of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    /// Read-only presentation of the committed values
    Viewing,
    /// Input fields mounted, values editable
    Editing,
}

/// Everything a row rendering needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub mode: RowMode,
    /// Effective values: draft where entered, committed otherwise
    pub values: RecordDraft,
    pub ip_address_error: Option<String>,
    pub label_error: Option<String>,
    /// The edit button is shown to the record's owner and to superusers
    pub edit_visible: bool,
    /// The delete button is shown to superusers only
    pub delete_visible: bool,
    pub inputs_enabled: bool,
    pub buttons_enabled: bool,
}

struct RowState {
    mode: RowMode,
    committed: RecordDraft,
    /// `None` models an input the user has not touched (or that is not
    /// mounted at all); it resolves to the committed value on save.
    ip_address_input: Option<String>,
    label_input: Option<String>,
    comment_input: Option<String>,
    ip_address_error: Option<String>,
    label_error: Option<String>,
    inputs_enabled: bool,
    buttons_enabled: bool,
}

impl RowState {
    fn effective(&self) -> RecordDraft {
        RecordDraft {
            ip_address: self
                .ip_address_input
                .clone()
                .unwrap_or_else(|| self.committed.ip_address.clone()),
            label: self
                .label_input
                .clone()
                .unwrap_or_else(|| self.committed.label.clone()),
            comment: self
                .comment_input
                .clone()
                .unwrap_or_else(|| self.committed.comment.clone()),
        }
    }

    fn clear_errors(&mut self) {
        self.ip_address_error = None;
        self.label_error = None;
    }

    fn clear_inputs(&mut self) {
        self.ip_address_input = None;
        self.label_input = None;
        self.comment_input = None;
    }

    fn enable(&mut self) {
        self.inputs_enabled = true;
        self.buttons_enabled = true;
    }

    fn disable(&mut self) {
        self.inputs_enabled = false;
        self.buttons_enabled = false;
    }
}

/// Decrements the shared in-flight counter when the operation ends
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Edit state machine for one record row
pub struct RowEditor {
    record_id: i64,
    recorder: UserRef,
    user: UserRef,
    api: Arc<dyn RecordApi>,
    store: Arc<TableStore>,
    confirm: Arc<DeleteConfirm>,
    events: mpsc::Sender<TableEvent>,
    row_ops: Arc<AtomicUsize>,
    state: Mutex<RowState>,
}

impl RowEditor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        record: &IpRecord,
        user: UserRef,
        api: Arc<dyn RecordApi>,
        store: Arc<TableStore>,
        confirm: Arc<DeleteConfirm>,
        events: mpsc::Sender<TableEvent>,
        row_ops: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            record_id: record.id,
            recorder: record.recorder.clone(),
            user,
            api,
            store,
            confirm,
            events,
            row_ops,
            state: Mutex::new(RowState {
                mode: RowMode::Viewing,
                committed: record.draft(),
                ip_address_input: None,
                label_input: None,
                comment_input: None,
                ip_address_error: None,
                label_error: None,
                inputs_enabled: true,
                buttons_enabled: true,
            }),
        }
    }

    /// Id of the record this editor is bound to
    pub fn record_id(&self) -> i64 {
        self.record_id
    }

    /// Current rendering state of the row
    pub async fn view(&self) -> RowView {
        let state = self.state.lock().await;
        RowView {
            mode: state.mode,
            values: state.effective(),
            ip_address_error: state.ip_address_error.clone(),
            label_error: state.label_error.clone(),
            edit_visible: can_edit_record(&self.user, &self.recorder),
            delete_visible: can_delete_record(&self.user),
            inputs_enabled: state.inputs_enabled,
            buttons_enabled: state.buttons_enabled,
        }
    }

    /// Toggle between Viewing and Editing
    ///
    /// Field errors are cleared on every transition, and draft inputs are
    /// reset so Editing always starts from the committed values.
    pub async fn switch_mode(&self) {
        let mut state = self.state.lock().await;
        state.mode = match state.mode {
            RowMode::Viewing => RowMode::Editing,
            RowMode::Editing => RowMode::Viewing,
        };
        state.clear_errors();
        state.clear_inputs();
    }

    /// Record a keystroke in the IP address input
    pub async fn set_ip_address_input(&self, value: impl Into<String>) {
        self.state.lock().await.ip_address_input = Some(value.into());
    }

    /// Record a keystroke in the label input
    pub async fn set_label_input(&self, value: impl Into<String>) {
        self.state.lock().await.label_input = Some(value.into());
    }

    /// Record a keystroke in the comment input
    pub async fn set_comment_input(&self, value: impl Into<String>) {
        self.state.lock().await.comment_input = Some(value.into());
    }

    /// Save the current draft
    ///
    /// Only the changed fields travel; an unchanged row switches back to
    /// Viewing without any network traffic.
    pub async fn save(&self) {
        let Some((effective, patch)) = self.begin_save().await else {
            return;
        };

        let result = {
            let _guard = InFlightGuard::new(&self.row_ops);
            self.api.update_record(self.record_id, &patch).await
        };

        match result {
            Ok(()) => {
                {
                    let mut state = self.state.lock().await;
                    state.committed = effective.clone();
                    state.mode = RowMode::Viewing;
                    state.clear_inputs();
                    state.enable();
                }
                // The local patch is authoritative; no re-fetch.
                self.store.patch_record(self.record_id, &effective).await;
                events::emit(&self.events, TableEvent::RowEdited { id: self.record_id });
            }
            Err(e) => {
                let mut state = self.state.lock().await;
                if let crate::Error::Rejected { codes } = &e {
                    for code in codes {
                        match code {
                            crate::RejectionCode::InvalidIpAddress => {
                                state.ip_address_error = Some(IP_ADDRESS_INVALID.to_string());
                            }
                            crate::RejectionCode::UnavailableLabel => {
                                state.label_error = Some(LABEL_UNAVAILABLE.to_string());
                            }
                            other => {
                                debug!(code = %other, id = self.record_id, "Unmapped rejection code");
                            }
                        }
                    }
                } else {
                    warn!(error = %e, id = self.record_id, "Record update failed");
                }
                // Stay in Editing with every entered value intact.
                state.enable();
            }
        }
    }

    /// Phase one of `save`, entirely under the state lock
    ///
    /// Returns the effective values and the non-empty patch to send, or
    /// `None` when nothing should go to the network.
    async fn begin_save(&self) -> Option<(RecordDraft, crate::model::RecordPatch)> {
        let mut state = self.state.lock().await;
        if state.mode != RowMode::Editing || !state.buttons_enabled {
            return None;
        }

        state.clear_errors();
        state.disable();

        let effective = state.effective();
        if effective.ip_address.trim().is_empty() {
            state.ip_address_error = Some(IP_ADDRESS_REQUIRED.to_string());
        }
        if effective.label.trim().is_empty() {
            state.label_error = Some(LABEL_REQUIRED.to_string());
        }
        if state.ip_address_error.is_some() || state.label_error.is_some() {
            state.enable();
            return None;
        }

        let patch = state.committed.diff(&effective);
        if patch.is_empty() {
            // The no-op edit doubles as cancel.
            state.mode = RowMode::Viewing;
            state.clear_inputs();
            state.enable();
            return None;
        }

        Some((effective, patch))
    }

    /// Ask for this row's deletion
    ///
    /// Registers a fresh snapshot and a handle to this row with the shared
    /// confirmation slot. Nothing is deleted until that slot is confirmed.
    pub async fn request_delete(self: &Arc<Self>) {
        if !can_delete_record(&self.user) {
            debug!(id = self.record_id, "Ignoring delete request without the capability");
            return;
        }

        let values = self.state.lock().await.effective();
        self.confirm
            .open(PendingDeletion::new(self.record_id, values, Arc::clone(self)));
    }

    /// Delete this record, having been confirmed
    ///
    /// A failed deletion only re-enables the controls; the row stays and
    /// no message is shown (the server-side log is the only trace).
    pub(crate) async fn execute_delete(&self) {
        self.state.lock().await.disable();

        let result = {
            let _guard = InFlightGuard::new(&self.row_ops);
            self.api.delete_record(self.record_id).await
        };

        match result {
            Ok(()) => {
                self.store.remove_record(self.record_id).await;
                events::emit(&self.events, TableEvent::RowDeleted { id: self.record_id });
            }
            Err(e) => {
                warn!(error = %e, id = self.record_id, "Record deletion failed");
                self.state.lock().await.enable();
            }
        }
    }
}
