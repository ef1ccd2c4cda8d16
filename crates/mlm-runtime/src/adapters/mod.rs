//! # Runtime Adapters
//!
//! - `storage`: report store backends, including RocksDB behind the
//!   `rocksdb` feature

pub mod storage;
