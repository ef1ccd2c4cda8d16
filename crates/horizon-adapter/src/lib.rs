//! # Horizon Adapter
//!
//! Ledger access over the Horizon REST API.
//!
//! ## Architecture
//!
//! - **Client**: `HorizonClient` implements `LedgerDataProvider` and
//!   `SwapLedger`
//! - **Signer**: `EnvelopeSigner` signs unsigned envelopes with the
//!   operating account's seed
//! - **Types**: Horizon JSON records and their conversion into ledger types
//!
//! ## Invariants
//!
//! - Nothing is submitted without a configured signer.
//! - Every asset holder is returned once, whatever the page boundaries.
//! - A 400 on submission is a rejection carrying the ledger's result codes.

pub mod client;
pub mod config;
pub mod signer;
pub mod types;

pub use client::HorizonClient;
pub use config::{HorizonConfig, DEFAULT_HORIZON_URL, DEFAULT_PAGE_LIMIT};
pub use signer::{EnvelopeSigner, SignedEnvelope};
