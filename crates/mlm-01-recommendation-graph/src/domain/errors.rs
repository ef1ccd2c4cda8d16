//! Error types for the Recommendation Graph

use shared_types::LedgerError;
use thiserror::Error;

/// All errors that can occur while producing the graph
#[derive(Debug, Error)]
pub enum GraphError {
    /// Enumerating aggregation-token holders failed
    #[error("Failed to enumerate holders: {0}")]
    Ledger(#[from] LedgerError),

    /// Configuration rejected before any ledger call
    #[error("Invalid graph configuration: {0}")]
    InvalidConfig(String),
}
