//! Report store over a key-value backend.
//!
//! ## Key layout
//!
//! ```text
//! meta:next_report_id             -> i64 (big-endian)
//! report:{id:020}                 -> bincode(Report)
//! recommend:{id:020}:{n:020}      -> bincode(RecommendRow)
//! distribute:{id:020}:{n:020}     -> bincode(DistributeRow)
//! conflict:{id:020}:{n:020}       -> bincode(ConflictRow)
//! ```
//!
//! Zero-padded ids keep prefix scans in creation order. A report and all of
//! its rows go into one atomic batch.

use crate::domain::entities::{ConflictRow, DistributeRow, NewReport, RecommendRow, Report};
use crate::domain::errors::{KVStoreError, LockError, StoreError};
use crate::domain::value_objects::ReportId;
use crate::ports::outbound::{BatchOperation, CycleLock, ExclusiveCycleGuard, KeyValueStore, ReportStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

const NEXT_ID_KEY: &[u8] = b"meta:next_report_id";
const REPORT_PREFIX: &str = "report:";
const RECOMMEND_PREFIX: &str = "recommend:";
const DISTRIBUTE_PREFIX: &str = "distribute:";
const CONFLICT_PREFIX: &str = "conflict:";

fn report_key(id: ReportId) -> Vec<u8> {
    format!("{}{:020}", REPORT_PREFIX, id).into_bytes()
}

fn rows_prefix(kind: &str, id: ReportId) -> Vec<u8> {
    format!("{}{:020}:", kind, id).into_bytes()
}

fn row_key(kind: &str, id: ReportId, n: usize) -> Vec<u8> {
    format!("{}{:020}:{:020}", kind, id, n).into_bytes()
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Reports persisted in a `KeyValueStore`, locked through a `CycleLock`.
pub struct KvReportStore<K: KeyValueStore, L: CycleLock> {
    kv: Mutex<K>,
    lock: L,
}

impl<K: KeyValueStore, L: CycleLock> KvReportStore<K, L> {
    pub fn new(kv: K, lock: L) -> Self {
        Self {
            kv: Mutex::new(kv),
            lock,
        }
    }

    fn next_id(kv: &K) -> Result<ReportId, StoreError> {
        match kv.get(NEXT_ID_KEY)? {
            None => Ok(1),
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Kv(KVStoreError::CorruptionError {
                        message: "next report id is not 8 bytes".to_string(),
                    })
                })?;
                Ok(i64::from_be_bytes(raw))
            }
        }
    }

    /// Every report, oldest first.
    fn all_reports(&self) -> Result<Vec<Report>, StoreError> {
        let kv = self.kv.lock();
        kv.prefix_scan(REPORT_PREFIX.as_bytes())?
            .iter()
            .map(|(_, v)| decode::<Report>(v))
            .collect()
    }

    fn rows<T: DeserializeOwned>(&self, kind: &str, id: ReportId) -> Result<Vec<T>, StoreError> {
        let kv = self.kv.lock();
        if !kv.exists(&report_key(id))? {
            return Err(StoreError::ReportNotFound(id));
        }
        kv.prefix_scan(&rows_prefix(kind, id))?
            .iter()
            .map(|(_, v)| decode::<T>(v))
            .collect()
    }
}

#[async_trait]
impl<K: KeyValueStore, L: CycleLock> ReportStore for KvReportStore<K, L> {
    async fn latest_reports(&self, limit: usize) -> Result<Vec<Report>, StoreError> {
        let mut reports = self.all_reports()?;
        reports.reverse();
        reports.truncate(limit);
        Ok(reports)
    }

    async fn pending_report(&self) -> Result<Option<Report>, StoreError> {
        Ok(self.all_reports()?.into_iter().rev().find(Report::is_pending))
    }

    async fn report_recommends(&self, id: ReportId) -> Result<Vec<RecommendRow>, StoreError> {
        self.rows(RECOMMEND_PREFIX, id)
    }

    async fn report_distributes(&self, id: ReportId) -> Result<Vec<DistributeRow>, StoreError> {
        self.rows(DISTRIBUTE_PREFIX, id)
    }

    async fn report_conflicts(&self, id: ReportId) -> Result<Vec<ConflictRow>, StoreError> {
        self.rows(CONFLICT_PREFIX, id)
    }

    async fn create_report(&self, new: NewReport) -> Result<Report, StoreError> {
        let mut kv = self.kv.lock();
        let id = Self::next_id(&kv)?;

        let report = Report {
            id,
            envelope_xdr: new.envelope_xdr,
            created_at: new.created_at,
            submission_hash: None,
        };

        let mut batch = Vec::with_capacity(
            2 + new.recommends.len() + new.distributes.len() + new.conflicts.len(),
        );
        batch.push(BatchOperation::put(report_key(id), encode(&report)?));
        for (n, row) in new.recommends.iter().enumerate() {
            batch.push(BatchOperation::put(row_key(RECOMMEND_PREFIX, id, n), encode(row)?));
        }
        for (n, row) in new.distributes.iter().enumerate() {
            batch.push(BatchOperation::put(row_key(DISTRIBUTE_PREFIX, id, n), encode(row)?));
        }
        for (n, row) in new.conflicts.iter().enumerate() {
            batch.push(BatchOperation::put(row_key(CONFLICT_PREFIX, id, n), encode(row)?));
        }
        batch.push(BatchOperation::put(NEXT_ID_KEY, (id + 1).to_be_bytes().to_vec()));

        kv.atomic_batch_write(batch)?;

        info!(
            report_id = id,
            recommends = new.recommends.len(),
            distributes = new.distributes.len(),
            conflicts = new.conflicts.len(),
            "[mlm-02] Report created"
        );
        Ok(report)
    }

    async fn set_report_hash(&self, id: ReportId, hash: &str) -> Result<(), StoreError> {
        let mut kv = self.kv.lock();
        let key = report_key(id);
        let mut report: Report = match kv.get(&key)? {
            Some(bytes) => decode(&bytes)?,
            None => return Err(StoreError::ReportNotFound(id)),
        };

        match &report.submission_hash {
            Some(existing) if existing == hash => return Ok(()),
            Some(existing) => {
                return Err(StoreError::AlreadySubmitted {
                    id,
                    hash: existing.clone(),
                })
            }
            None => {}
        }

        report.submission_hash = Some(hash.to_string());
        kv.put(&key, &encode(&report)?)?;
        info!(report_id = id, hash, "[mlm-02] Report hash recorded");
        Ok(())
    }

    async fn lock_cycle(&self) -> Result<ExclusiveCycleGuard, LockError> {
        let guard = self.lock.acquire().await?;
        // Another process may have written a report while we waited
        self.kv.lock().refresh().map_err(LockError::Reload)?;
        Ok(guard)
    }
}
