//! In-memory scan server for engine tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::api::{HourlyStats, ScanApi};
use crate::error::{Error, Result};
use crate::models::{ScanCandidate, ScanId, ScanRecord};

#[derive(Default)]
pub struct FakeScanApi {
    store: RefCell<Vec<ScanRecord>>,
    latest: RefCell<VecDeque<ScanCandidate>>,
    next_id: Cell<i64>,
    persist_calls: Cell<usize>,
    latest_calls: Cell<usize>,
    fail_history: Cell<bool>,
    fail_latest: Cell<bool>,
    fail_persist: Cell<bool>,
    fail_delete: Cell<bool>,
    fail_clear: Cell<bool>,
}

impl FakeScanApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record straight to the server store and return its id.
    pub fn seed_history(&self, data: &str, product_name: Option<&str>) -> ScanId {
        let mut candidate = ScanCandidate::new(data, "EAN13");
        candidate.product_name = product_name.map(ToString::to_string);
        self.store_record(&candidate).id
    }

    /// Queue a scan for a later `fetch_latest` call.
    pub fn queue_latest(&self, candidate: ScanCandidate) {
        self.latest.borrow_mut().push_back(candidate);
    }

    /// Drop a record server-side without the client knowing.
    pub fn forget(&self, id: ScanId) {
        self.store.borrow_mut().retain(|record| record.id != id);
    }

    pub fn fail_history(&self, fail: bool) {
        self.fail_history.set(fail);
    }

    pub fn fail_latest(&self, fail: bool) {
        self.fail_latest.set(fail);
    }

    pub fn fail_persist(&self, fail: bool) {
        self.fail_persist.set(fail);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.set(fail);
    }

    pub fn fail_clear(&self, fail: bool) {
        self.fail_clear.set(fail);
    }

    pub fn persist_calls(&self) -> usize {
        self.persist_calls.get()
    }

    pub fn latest_calls(&self) -> usize {
        self.latest_calls.get()
    }

    fn store_record(&self, candidate: &ScanCandidate) -> ScanRecord {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let record = ScanRecord {
            id: ScanId::new(id),
            data: candidate.data.clone(),
            code_type: candidate.code_type.clone(),
            product_name: candidate.product_name.clone(),
            timestamp: chrono::Local::now().naive_local(),
            scan_count: candidate.scan_count,
        };
        self.store.borrow_mut().insert(0, record.clone());
        record
    }
}

fn unreachable_server() -> Error {
    Error::Transport("connection refused".to_string())
}

impl ScanApi for FakeScanApi {
    async fn fetch_history(&self) -> Result<Vec<ScanRecord>> {
        if self.fail_history.get() {
            return Err(unreachable_server());
        }
        Ok(self.store.borrow().clone())
    }

    async fn fetch_latest(&self) -> Result<Vec<ScanCandidate>> {
        if self.fail_latest.get() {
            return Err(unreachable_server());
        }
        self.latest_calls.set(self.latest_calls.get() + 1);
        Ok(self.latest.borrow_mut().pop_front().into_iter().collect())
    }

    async fn persist(&self, candidate: &ScanCandidate) -> Result<ScanRecord> {
        if self.fail_persist.get() {
            return Err(unreachable_server());
        }
        self.persist_calls.set(self.persist_calls.get() + 1);
        Ok(self.store_record(candidate))
    }

    async fn delete(&self, id: ScanId) -> Result<()> {
        if self.fail_delete.get() {
            return Err(unreachable_server());
        }
        let mut store = self.store.borrow_mut();
        let before = store.len();
        store.retain(|record| record.id != id);
        if store.len() == before {
            Err(Error::NotFound(id))
        } else {
            Ok(())
        }
    }

    async fn delete_all(&self) -> Result<()> {
        if self.fail_clear.get() {
            return Err(unreachable_server());
        }
        self.store.borrow_mut().clear();
        Ok(())
    }

    async fn hourly_stats(&self) -> Result<HourlyStats> {
        let mut data = vec![0; 24];
        data[0] = u32::try_from(self.store.borrow().len()).unwrap_or(u32::MAX);
        Ok(HourlyStats {
            labels: (0..24).map(|hour| format!("{hour:02}:00")).collect(),
            data,
        })
    }
}
