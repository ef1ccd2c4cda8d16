//! # Adapters
//!
//! - `storage`: `KeyValueStore` backends (in-memory, single file)
//! - `lock`: `CycleLock` implementations (fs2 file lock, in-process flag)
//! - `report_store`: `KvReportStore`, the `ReportStore` over any of the above

pub mod lock;
pub mod report_store;
pub mod storage;

pub use lock::{FileCycleLock, InProcessCycleLock};
pub use report_store::KvReportStore;
pub use storage::{FileBackedKVStore, InMemoryKVStore};

use std::path::Path;
use std::time::Duration;

/// Report store file inside a data directory.
pub const REPORT_STORE_FILE: &str = "reports.db";

/// Report store persisted under `data_dir`, locked by `<data_dir>/cycle.lock`.
pub fn open_file_report_store(
    data_dir: &Path,
    lock_timeout: Duration,
) -> Result<KvReportStore<FileBackedKVStore, FileCycleLock>, crate::domain::errors::KVStoreError> {
    let kv = FileBackedKVStore::open(data_dir.join(REPORT_STORE_FILE))?;
    Ok(KvReportStore::new(kv, FileCycleLock::new(data_dir, lock_timeout)))
}

/// Report store that lives only as long as the process.
pub fn in_memory_report_store() -> KvReportStore<InMemoryKVStore, InProcessCycleLock> {
    KvReportStore::new(InMemoryKVStore::new(), InProcessCycleLock::default())
}
