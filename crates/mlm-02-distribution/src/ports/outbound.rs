//! Outbound Ports (Driven Ports / SPI)
//!
//! - `ReportStore`: persisted reports, their rows, and the cycle lock
//! - `KeyValueStore`: byte-level backend under the KV report store
//! - `CycleLock`: cross-invocation exclusivity
//! - `LedgerDataProvider` / `RecommendationGraphApi`: shared with the other
//!   subsystems

use crate::domain::entities::{ConflictRow, DistributeRow, NewReport, RecommendRow, Report};
use crate::domain::errors::{KVStoreError, LockError, StoreError};
use crate::domain::value_objects::ReportId;
use async_trait::async_trait;
use std::any::Any;
use tracing::debug;

pub use mlm_01_recommendation_graph::RecommendationGraphApi;
pub use shared_types::{LedgerDataProvider, TimeSource};

// =============================================================================
// CYCLE LOCK
// =============================================================================

/// Proof that this invocation owns the distribution cycle.
///
/// Releasing is tied to `Drop`, so every exit path of a cycle unlocks.
pub struct ExclusiveCycleGuard {
    holder: Option<Box<dyn Any + Send + Sync>>,
}

impl ExclusiveCycleGuard {
    /// Wrap the adapter-specific value whose own `Drop` releases the lock.
    pub fn new(holder: impl Any + Send + Sync) -> Self {
        Self {
            holder: Some(Box::new(holder)),
        }
    }
}

impl Drop for ExclusiveCycleGuard {
    fn drop(&mut self) {
        if self.holder.take().is_some() {
            debug!("[mlm-02] Cycle lock released");
        }
    }
}

impl std::fmt::Debug for ExclusiveCycleGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExclusiveCycleGuard")
            .field("held", &self.holder.is_some())
            .finish()
    }
}

/// Locking primitive used by report stores.
#[async_trait]
pub trait CycleLock: Send + Sync {
    /// Wait until the lock is free or the configured timeout expires.
    async fn acquire(&self) -> Result<ExclusiveCycleGuard, LockError>;
}

// =============================================================================
// REPORT STORE
// =============================================================================

/// Persisted distribution reports.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Up to `limit` reports, most recent first.
    async fn latest_reports(&self, limit: usize) -> Result<Vec<Report>, StoreError>;

    /// The most recent report without a submission hash.
    async fn pending_report(&self) -> Result<Option<Report>, StoreError>;

    async fn report_recommends(&self, id: ReportId) -> Result<Vec<RecommendRow>, StoreError>;

    async fn report_distributes(&self, id: ReportId) -> Result<Vec<DistributeRow>, StoreError>;

    async fn report_conflicts(&self, id: ReportId) -> Result<Vec<ConflictRow>, StoreError>;

    /// Write the header and every row set atomically.
    async fn create_report(&self, report: NewReport) -> Result<Report, StoreError>;

    /// Attach the ledger transaction hash; the report stops being pending.
    async fn set_report_hash(&self, id: ReportId, hash: &str) -> Result<(), StoreError>;

    /// Exclusive access to the cycle for the lifetime of the guard.
    async fn lock_cycle(&self) -> Result<ExclusiveCycleGuard, LockError>;
}

// =============================================================================
// KEY-VALUE BACKEND
// =============================================================================

/// Result of a prefix scan, ordered by key.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Abstract interface for key-value database operations.
///
/// Production: `FileBackedKVStore`, or `RocksDbStore` in mlm-runtime.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either every operation is applied or none is.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// Entries whose key starts with `prefix`, in key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;

    /// Pick up writes made by other processes since the store was opened.
    ///
    /// Called right after the cycle lock is acquired. Backends that read
    /// through to their database have nothing to do.
    fn refresh(&mut self) -> Result<(), KVStoreError> {
        Ok(())
    }
}

/// Batch operation for atomic writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

/// Mock implementations for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// In-memory store whose writes can be made to fail on demand.
    ///
    /// A failing batch is rejected before anything is applied, which is what
    /// a real transactional backend does on commit failure.
    #[derive(Clone, Default)]
    pub struct FaultyKVStore {
        data: Arc<Mutex<BTreeMap<Vec<u8>, Vec<u8>>>>,
        fail_writes: Arc<AtomicBool>,
    }

    impl FaultyKVStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.data.lock().len()
        }

        pub fn is_empty(&self) -> bool {
            self.data.lock().is_empty()
        }

        fn check(&self) -> Result<(), KVStoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(KVStoreError::IOError {
                    message: "injected write failure".to_string(),
                });
            }
            Ok(())
        }
    }

    impl KeyValueStore for FaultyKVStore {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
            Ok(self.data.lock().get(key).cloned())
        }

        fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
            self.check()?;
            self.data.lock().insert(key.to_vec(), value.to_vec());
            Ok(())
        }

        fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
            self.check()?;
            self.data.lock().remove(key);
            Ok(())
        }

        fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
            self.check()?;
            let mut data = self.data.lock();
            for op in operations {
                match op {
                    BatchOperation::Put { key, value } => {
                        data.insert(key, value);
                    }
                    BatchOperation::Delete { key } => {
                        data.remove(&key);
                    }
                }
            }
            Ok(())
        }

        fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
            Ok(self.data.lock().contains_key(key))
        }

        fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
            Ok(self
                .data
                .lock()
                .range(prefix.to_vec()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect())
        }
    }
}
