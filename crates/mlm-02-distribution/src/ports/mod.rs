//! Ports module for the Distribution subsystem
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::DistributionApi;
pub use outbound::{
    BatchOperation, CycleLock, ExclusiveCycleGuard, KeyValueStore, ReportStore, ScanResult,
};
