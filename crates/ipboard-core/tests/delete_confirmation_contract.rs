//! Architectural Contract Test: Delete Confirmation
//!
//! Constraints verified:
//! - There is exactly one confirmation slot; opening it again overwrites
//!   the pending deletion (last intent wins)
//! - Confirming deletes through the row bound at request time, removes
//!   the record from the store and reconciles the counts without a
//!   re-fetch
//! - Cancelling clears the slot without any network traffic
//! - A failed deletion is swallowed: the record stays, controls re-enable

mod common;

use common::*;
use ipboard_core::{Error, TableConfig, TableEngine, TableEvent};

async fn loaded_engine() -> (
    TableEngine,
    tokio::sync::mpsc::Receiver<TableEvent>,
    std::sync::Arc<MockRecordApi>,
) {
    let admin = user(9, true);
    let api = MockRecordApi::with_records(records(5, &user(1, false)));
    let session = MockSession::new(admin);
    let (engine, mut events) =
        TableEngine::new(api.clone(), session, TableConfig::default()).unwrap();
    engine.pages().request_page(0).await;
    while events.try_recv().is_ok() {}
    (engine, events, api)
}

#[tokio::test]
async fn second_request_overwrites_the_pending_deletion() {
    let (engine, mut events, api) = loaded_engine().await;

    let first = engine.editor(1).await.unwrap();
    let second = engine.editor(2).await.unwrap();

    first.request_delete().await;
    second.request_delete().await;

    let (pending_id, values) = engine.confirm().pending().unwrap();
    assert_eq!(pending_id, 2, "the later request won the slot");
    assert_eq!(values.label, "host-2");

    engine.confirm().confirm().await;

    assert_eq!(api.delete_call_count(), 1, "only the pending row was deleted");
    assert_eq!(events.try_recv().unwrap(), TableEvent::RowDeleted { id: 2 });

    let state = engine.store().snapshot().await;
    assert!(state.ips.iter().any(|r| r.id == 1), "the first row survived");
    assert!(state.ips.iter().all(|r| r.id != 2));
    assert_eq!(state.count, 4);
    assert_eq!(state.num_total_items, 4);
    assert_eq!(api.fetch_call_count(), 1, "no re-fetch after the removal");
}

#[tokio::test]
async fn snapshot_reflects_the_values_at_request_time() {
    let (engine, _events, _api) = loaded_engine().await;
    let editor = engine.editor(3).await.unwrap();

    editor.switch_mode().await;
    editor.set_label_input("about-to-go").await;
    editor.request_delete().await;

    let (_, values) = engine.confirm().pending().unwrap();
    assert_eq!(values.label, "about-to-go", "the draft value is what gets shown");
}

#[tokio::test]
async fn cancel_clears_without_deleting() {
    let (engine, mut events, api) = loaded_engine().await;
    let editor = engine.editor(1).await.unwrap();

    editor.request_delete().await;
    engine.confirm().cancel();

    assert!(engine.confirm().pending().is_none());

    // A confirm on the now-empty slot is a no-op.
    engine.confirm().confirm().await;
    assert_eq!(api.delete_call_count(), 0);
    assert!(events.try_recv().is_err());
    assert_eq!(engine.store().snapshot().await.ips.len(), 5);
}

#[tokio::test]
async fn failed_deletion_is_swallowed() {
    let (engine, mut events, api) = loaded_engine().await;
    let editor = engine.editor(1).await.unwrap();

    api.fail_next_delete(Error::api("boom"));
    editor.request_delete().await;
    engine.confirm().confirm().await;

    assert_eq!(api.delete_call_count(), 1);
    assert!(events.try_recv().is_err(), "no RowDeleted, no error event either");

    let state = engine.store().snapshot().await;
    assert_eq!(state.ips.len(), 5, "the record stays");
    assert_eq!(state.num_total_items, 5);

    let view = editor.view().await;
    assert!(view.buttons_enabled, "controls come back for another attempt");
    assert!(view.inputs_enabled);
}
