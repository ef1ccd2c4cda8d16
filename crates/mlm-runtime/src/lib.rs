//! # MLM Runtime Library
//!
//! Exposes the runtime's modules for testing. The entry point is the
//! `main.rs` binary.
//!
//! ## Modules
//!
//! - `container/` - configuration and subsystem wiring
//! - `adapters/` - report store backends (RocksDB behind a feature)
//! - `commands` - CLI definition and command handlers

pub mod adapters;
pub mod commands;
pub mod container;

pub use commands::{Cli, Command, ReportAction};
pub use container::{load_config, AppConfig, ConfigError, ServiceContainer, StorageBackend};
