//! Ports module for the Token Swap subsystem
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::SwapApi;
pub use outbound::{LedgerDataProvider, SwapLedger, TimeSource};
