//! Architectural Contract Test: Pagination
//!
//! Constraints verified:
//! - Out-of-bounds page requests are silent no-ops with no network traffic
//! - A loaded page replaces the store wholesale, using the server's
//!   page number (server-side clamping wins)
//! - After a load, the displayed records match the reported count
//! - A fetch failure clears credentials exactly once, emits
//!   SessionInvalidated, and leaves the pagination controls disabled

mod common;

use common::*;
use ipboard_core::{Error, TableConfig, TableEngine, TableEvent};

#[tokio::test]
async fn out_of_bounds_request_is_a_silent_no_op() {
    let owner = user(1, false);
    let api = MockRecordApi::with_records(records(25, &owner));
    let session = MockSession::new(owner);
    let (engine, mut events) =
        TableEngine::new(api.clone(), session, TableConfig::default()).unwrap();

    engine.pages().request_page(0).await;
    assert_eq!(api.fetch_call_count(), 1);
    while events.try_recv().is_ok() {}

    // 25 records at 10 per page: pages 0..3. Page 3 is out of bounds.
    engine.pages().request_page(3).await;
    assert_eq!(api.fetch_call_count(), 1, "no fetch for an out-of-bounds page");
    assert!(events.try_recv().is_err(), "no events either");
    assert_eq!(engine.store().snapshot().await.page_number, 0);
}

#[tokio::test]
async fn loaded_page_replaces_the_store_wholesale() {
    let owner = user(1, false);
    let api = MockRecordApi::with_records(records(25, &owner));
    let session = MockSession::new(owner.clone());
    let (engine, mut events) =
        TableEngine::new(api.clone(), session, TableConfig::default()).unwrap();

    engine.pages().request_page(0).await;
    assert_eq!(events.try_recv().unwrap(), TableEvent::ScrollToAnchor);
    assert_eq!(
        events.try_recv().unwrap(),
        TableEvent::PageLoaded {
            page_number: 0,
            count: 10
        }
    );

    let state = engine.store().snapshot().await;
    assert_eq!(state.ips.len(), state.count, "records match the reported count");
    assert_eq!(state.page_count(), 3);

    engine.pages().request_page(2).await;
    let state = engine.store().snapshot().await;
    assert_eq!(state.page_number, 2);
    assert_eq!(state.count, 5);
    assert_eq!(state.ips.len(), 5);
    assert_eq!(state.ips[0].id, 21);
}

#[tokio::test]
async fn server_clamped_page_number_wins() {
    let owner = user(1, false);
    let api = MockRecordApi::with_records(records(25, &owner));
    let session = MockSession::new(owner.clone());
    let (engine, _events) =
        TableEngine::new(api.clone(), session, TableConfig::default()).unwrap();

    engine.pages().request_page(0).await;

    // Records deleted elsewhere: the client still believes in 3 pages,
    // but the server now only has 2.
    api.set_records(records(12, &owner));

    engine.pages().request_page(2).await;
    let state = engine.store().snapshot().await;
    assert_eq!(state.page_number, 1, "the server's page number is kept");
    assert_eq!(state.num_total_items, 12);
    assert_eq!(state.ips.len(), state.count);
}

#[tokio::test]
async fn fetch_failure_invalidates_the_session_once() {
    let owner = user(1, false);
    let api = MockRecordApi::with_records(records(25, &owner));
    let session = MockSession::new(owner);
    let (engine, mut events) =
        TableEngine::new(api.clone(), session.clone(), TableConfig::default()).unwrap();

    api.fail_next_fetch(Error::http("401 Unauthorized"));
    engine.pages().request_page(0).await;

    assert_eq!(session.clear_call_count(), 1, "credentials cleared exactly once");
    assert_eq!(events.try_recv().unwrap(), TableEvent::ScrollToAnchor);
    assert_eq!(events.try_recv().unwrap(), TableEvent::SessionInvalidated);

    // The table is unusable until re-login: controls stay disabled and
    // further page requests go nowhere.
    assert!(!engine.pages().pagination().await.buttons_enabled);
    engine.pages().request_page(0).await;
    assert_eq!(api.fetch_call_count(), 1);
    assert_eq!(session.clear_call_count(), 1);
}

#[tokio::test]
async fn bootstrap_fetch_populates_an_empty_table() {
    let owner = user(1, false);
    let api = MockRecordApi::with_records(Vec::new());
    let session = MockSession::new(owner);
    let (engine, _events) =
        TableEngine::new(api.clone(), session, TableConfig::default()).unwrap();

    engine.pages().request_page(0).await;

    let state = engine.store().snapshot().await;
    assert!(state.loaded);
    assert_eq!(state.num_total_items, 0);
    assert!(state.ips.is_empty());

    let view = engine.pages().pagination().await;
    assert!(!view.prev_visible);
    assert!(!view.next_visible, "both buttons hidden on a single page");
}
