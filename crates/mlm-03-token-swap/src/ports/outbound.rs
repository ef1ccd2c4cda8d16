//! Outbound Ports (Driven Ports / SPI)
//!
//! - `SwapLedger`: path finding and strict-send execution
//! - `LedgerDataProvider`: balances of the operating account

use crate::domain::entities::{PathQuote, StrictSendOrder, StrictSendReceipt};
use async_trait::async_trait;
use shared_types::{Amount, Asset, LedgerError};

pub use shared_types::{LedgerDataProvider, TimeSource};

/// Exchange access on the ledger.
#[async_trait]
pub trait SwapLedger: Send + Sync {
    /// Paths converting exactly `source_amount` of `source` into
    /// `destination`, best first.
    async fn strict_send_paths(
        &self,
        source: &Asset,
        source_amount: Amount,
        destination: &Asset,
    ) -> Result<Vec<PathQuote>, LedgerError>;

    /// Sign and submit `order` along the best path for its full amount.
    async fn execute_strict_send(&self, order: &StrictSendOrder) -> Result<StrictSendReceipt, LedgerError>;
}
