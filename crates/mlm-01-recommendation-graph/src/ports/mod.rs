//! Ports module for the Recommendation Graph
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::RecommendationGraphApi;
pub use outbound::LedgerDataProvider;
