//! Outbound Ports (Driven Ports / SPI)
//!
//! The only dependency of this subsystem is the shared ledger data
//! provider, which guarantees full enumeration across pages.

pub use shared_types::LedgerDataProvider;
