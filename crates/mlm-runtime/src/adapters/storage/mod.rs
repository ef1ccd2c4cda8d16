//! # Production Storage Adapters
//!
//! Enable the `rocksdb` feature to persist reports in RocksDB instead of the
//! single-file store:
//!
//! ```toml
//! mlm-runtime = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! Either backend sits under `KvReportStore` and shares the fs2 cycle lock
//! in the data directory.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{open_rocksdb_report_store, RocksDbConfig, RocksDbStore, ROCKSDB_DIR};

// Re-export the built-in backends
pub use mlm_02_distribution::adapters::{
    in_memory_report_store, open_file_report_store, FileBackedKVStore, InMemoryKVStore,
};
