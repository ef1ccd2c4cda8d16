//! # MLM-03: Token Swap Subsystem
//!
//! Converts auxiliary token balances of the operating account into the reward
//! token through the ledger's path payments, guarded by a price threshold.
//!
//! ## Architecture
//!
//! - **Domain**: `PathQuote`, `StrictSendOrder`, `SwapResult`,
//!   `PriceExceededAlert`, `SwapError`, `SwapSummary`
//! - **Algorithms**: price gate, slippage floor, swap transaction builder
//! - **Ports**: Inbound (`SwapApi`), Outbound (`SwapLedger`,
//!   `LedgerDataProvider`)
//! - **Application**: `SwapService` (sequential per-token swaps)
//!
//! ## Invariants
//!
//! - A price above the threshold is an alert, never an error.
//! - A failure for one token never stops the others.
//! - Totals only count successful swaps.

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use algorithms::{build_swap_transaction, swap_memo, SwapPlan};
pub use application::service::SwapService;
pub use config::SwapConfig;
pub use domain::entities::*;
pub use domain::errors::*;
pub use domain::value_objects::*;
pub use ports::inbound::SwapApi;
pub use ports::outbound::SwapLedger;
