//! Error types for the Token Swap subsystem

use shared_types::{AccountId, Amount, Asset, EnvelopeError, LedgerError};
use thiserror::Error;

/// Errors that abort a whole `execute_swaps` call
#[derive(Debug, Error)]
pub enum SwapEngineError {
    /// The operating account's balances could not be read
    #[error("Failed to read balances of {account}: {source}")]
    BalanceLookup {
        account: AccountId,
        #[source]
        source: LedgerError,
    },
}

/// Why a single token's quote or conversion failed
#[derive(Debug, Error)]
pub enum SwapFailure {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The best path quotes nothing for one source unit
    #[error("Zero quote for {}", .asset.canonical())]
    ZeroQuote { asset: Asset },

    /// The balance converts to no positive minimum output
    #[error("Balance {balance} of {} is too small to swap", .asset.canonical())]
    OutputTooSmall { asset: Asset, balance: Amount },

    #[error("Swap transaction could not be encoded: {0}")]
    Envelope(#[from] EnvelopeError),
}
