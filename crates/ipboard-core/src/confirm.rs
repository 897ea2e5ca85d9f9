// # Delete Confirmation
//
// The single shared confirmation slot behind every row's delete button.
//
// There is exactly one slot per table. Opening it for a second row before
// the first was answered simply overwrites the slot: last intent wins, no
// queue. The slot holds both the values to show ("delete 10.0.0.1 /
// host-1?") and a handle back to the requesting row, captured fresh at
// the moment of the request.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::model::RecordDraft;
use crate::row::RowEditor;

/// A deletion awaiting the user's answer
pub struct PendingDeletion {
    record_id: i64,
    values: RecordDraft,
    row: Arc<RowEditor>,
}

impl PendingDeletion {
    pub(crate) fn new(record_id: i64, values: RecordDraft, row: Arc<RowEditor>) -> Self {
        Self {
            record_id,
            values,
            row,
        }
    }
}

/// The shared confirmation slot
#[derive(Default)]
pub struct DeleteConfirm {
    slot: Mutex<Option<PendingDeletion>>,
}

impl DeleteConfirm {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Arm the slot for one row, overwriting any previous pending deletion
    pub(crate) fn open(&self, pending: PendingDeletion) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.as_ref() {
            debug!(
                previous = previous.record_id,
                next = pending.record_id,
                "Replacing pending deletion"
            );
        }
        *slot = Some(pending);
    }

    /// The record id and values of the pending deletion, if any
    ///
    /// This is what the confirmation surface renders.
    pub fn pending(&self) -> Option<(i64, RecordDraft)> {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|p| (p.record_id, p.values.clone()))
    }

    /// Answer yes: take the slot and delete through the bound row
    ///
    /// A confirm on an empty slot is a no-op.
    pub async fn confirm(&self) {
        let taken = self.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(pending) = taken {
            pending.row.execute_delete().await;
        }
    }

    /// Answer no: clear the slot without deleting anything
    pub fn cancel(&self) {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
    }
}
