//! Test doubles and common utilities for architecture contract tests
//!
//! The mock record API serves pages from an in-memory dataset the way the
//! real service does (including clamping an out-of-range page number) and
//! counts every call, so tests can assert both on state and on traffic.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use ipboard_core::error::{Error, Result};
use ipboard_core::model::{IpRecord, RecordPage, RecordPatch, UserRef};
use ipboard_core::traits::{RecordApi, SessionService};

/// A record API over an in-memory dataset, with scripted failures
pub struct MockRecordApi {
    records: Mutex<Vec<IpRecord>>,
    fetch_failures: Mutex<VecDeque<Error>>,
    update_failures: Mutex<VecDeque<Error>>,
    delete_failures: Mutex<VecDeque<Error>>,
    fetch_call_count: AtomicUsize,
    update_call_count: AtomicUsize,
    delete_call_count: AtomicUsize,
    recorded_patches: Mutex<Vec<(i64, RecordPatch)>>,
}

impl MockRecordApi {
    pub fn with_records(records: Vec<IpRecord>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
            fetch_failures: Mutex::new(VecDeque::new()),
            update_failures: Mutex::new(VecDeque::new()),
            delete_failures: Mutex::new(VecDeque::new()),
            fetch_call_count: AtomicUsize::new(0),
            update_call_count: AtomicUsize::new(0),
            delete_call_count: AtomicUsize::new(0),
            recorded_patches: Mutex::new(Vec::new()),
        })
    }

    /// Replace the backing dataset, simulating changes made elsewhere
    pub fn set_records(&self, records: Vec<IpRecord>) {
        *self.records.lock().unwrap() = records;
    }

    /// Script the next fetch to fail with `error`
    pub fn fail_next_fetch(&self, error: Error) {
        self.fetch_failures.lock().unwrap().push_back(error);
    }

    /// Script the next update to fail with `error`
    pub fn fail_next_update(&self, error: Error) {
        self.update_failures.lock().unwrap().push_back(error);
    }

    /// Script the next delete to fail with `error`
    pub fn fail_next_delete(&self, error: Error) {
        self.delete_failures.lock().unwrap().push_back(error);
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    pub fn delete_call_count(&self) -> usize {
        self.delete_call_count.load(Ordering::SeqCst)
    }

    /// Every patch that reached the server, in call order
    pub fn recorded_patches(&self) -> Vec<(i64, RecordPatch)> {
        self.recorded_patches.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordApi for MockRecordApi {
    async fn fetch_page(&self, items_per_page: u32, page_number: u32) -> Result<RecordPage> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.fetch_failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        let records = self.records.lock().unwrap();
        let total = records.len() as u64;
        let page_count = total.div_ceil(items_per_page as u64).max(1) as u32;

        // The real service clamps an out-of-range page to the last one.
        let served = page_number.min(page_count - 1);
        let start = served as usize * items_per_page as usize;
        let ips: Vec<IpRecord> = records
            .iter()
            .skip(start)
            .take(items_per_page as usize)
            .cloned()
            .collect();

        Ok(RecordPage {
            num_total_items: total,
            count: ips.len(),
            page_number: served,
            ips,
        })
    }

    async fn update_record(&self, id: i64, patch: &RecordPatch) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.recorded_patches
            .lock()
            .unwrap()
            .push((id, patch.clone()));

        if let Some(error) = self.update_failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::rejected(ipboard_core::RejectionCode::NonexistentIpAddress))?;
        if let Some(ip) = &patch.ip_address {
            record.ip_address = ip.clone();
        }
        if let Some(label) = &patch.label {
            record.label = label.clone();
        }
        if let Some(comment) = &patch.comment {
            record.comment = comment.clone();
        }
        Ok(())
    }

    async fn delete_record(&self, id: i64) -> Result<()> {
        self.delete_call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.delete_failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        self.records.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}

/// A session with a fixed user and a clear-credentials call counter
pub struct MockSession {
    user: UserRef,
    clear_call_count: AtomicUsize,
}

impl MockSession {
    pub fn new(user: UserRef) -> Arc<Self> {
        Arc::new(Self {
            user,
            clear_call_count: AtomicUsize::new(0),
        })
    }

    pub fn clear_call_count(&self) -> usize {
        self.clear_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionService for MockSession {
    fn current_user(&self) -> UserRef {
        self.user.clone()
    }

    async fn clear_credentials(&self) -> Result<()> {
        self.clear_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A user fixture
pub fn user(id: i64, is_superuser: bool) -> UserRef {
    UserRef {
        id,
        username: format!("user{}", id),
        is_superuser,
    }
}

/// A record fixture; ids start at 1
pub fn record(id: i64, recorder: &UserRef) -> IpRecord {
    IpRecord {
        id,
        ip_address: format!("10.0.0.{}", id),
        label: format!("host-{}", id),
        comment: String::new(),
        created_on: Utc::now(),
        recorder: recorder.clone(),
    }
}

/// `n` record fixtures recorded by `recorder`
pub fn records(n: usize, recorder: &UserRef) -> Vec<IpRecord> {
    (1..=n as i64).map(|id| record(id, recorder)).collect()
}
