//! # MLM-02: Distribution Subsystem
//!
//! Splits a share of the operating account's reward tokens among
//! recommenders in proportion to the score their recommended accounts gained
//! since the last report, persists the result as a report and submits the
//! payout transaction.
//!
//! ## Architecture
//!
//! - **Domain**: `Report`, the persisted rows, `DistributionPlan`, `Baseline`
//! - **Algorithms**: incremental calculator, transfer instruction builder
//! - **Ports**: Inbound (`DistributionApi`), Outbound (`ReportStore`,
//!   `KeyValueStore`, `CycleLock`, `LedgerDataProvider`,
//!   `RecommendationGraphApi`)
//! - **Adapters**: `KvReportStore` over in-memory or file-backed storage,
//!   fs2 file lock and in-process lock
//! - **Application**: `DistributionService` (one locked, resumable cycle)
//!
//! ## Invariants
//!
//! - Payouts are truncated to stroops and never sum above the pool.
//! - A conflicted recommended account contributes nothing to any payout.
//! - A report is written together with all of its rows, or not at all.
//! - At most one report is pending; it is resumed, never recomputed.
//! - The cycle lock is released on every exit path.

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{
    in_memory_report_store, open_file_report_store, FileBackedKVStore, FileCycleLock,
    InMemoryKVStore, InProcessCycleLock, KvReportStore,
};
pub use algorithms::{build_transfer_instructions, calculate_distribution, plan_from_rows};
pub use application::service::DistributionService;
pub use config::DistributionConfig;
pub use domain::entities::*;
pub use domain::errors::*;
pub use domain::value_objects::*;
pub use ports::inbound::DistributionApi;
pub use ports::outbound::{
    BatchOperation, CycleLock, ExclusiveCycleGuard, KeyValueStore, ReportStore, ScanResult,
};
