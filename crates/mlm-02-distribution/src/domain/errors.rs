//! Error types for the Distribution subsystem

use super::value_objects::ReportId;
use mlm_01_recommendation_graph::GraphError;
use shared_types::{AccountId, EnvelopeError, LedgerError};
use std::path::PathBuf;
use thiserror::Error;

/// All errors that can end a distribution cycle
#[derive(Debug, Error)]
pub enum DistributionError {
    /// The operating account holds nothing to split
    #[error("No balance: {account} holds no reward tokens to distribute")]
    NoBalance { account: AccountId },

    /// Persistence was requested but every payout is zero
    #[error("No distributes: nothing to distribute")]
    NoDistributes,

    #[error("Trustline check for {account} failed: {source}")]
    TrustlineCheckFailed {
        account: AccountId,
        #[source]
        source: LedgerError,
    },

    /// Nothing of the report survives a persistence failure
    #[error("Report persistence failed: {0}")]
    PersistenceFailed(#[from] StoreError),

    /// Ledger rejection, message kept verbatim
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Recommendation graph unavailable: {0}")]
    Graph(#[from] GraphError),

    #[error("Cycle lock unavailable: {0}")]
    Lock(#[from] LockError),

    #[error("Transfer instructions could not be encoded: {0}")]
    Envelope(#[from] EnvelopeError),
}

/// Report store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Kv(#[from] KVStoreError),

    #[error("Row encoding failed: {0}")]
    Serialization(String),

    #[error("Report {0} not found")]
    ReportNotFound(ReportId),

    #[error("Report {id} already has submission hash {hash}")]
    AlreadySubmitted { id: ReportId, hash: String },
}

/// Key-value backend errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

/// Cycle lock errors
#[derive(Debug, Error)]
pub enum LockError {
    /// Lock file could not be created or written
    #[error("Lock file error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another cycle held the lock for the whole timeout
    #[error("Cycle already running{}", describe_holder(.holder))]
    AlreadyLocked { holder: Option<u32> },

    /// Store contents could not be re-read once the lock was held
    #[error("Failed to reload report storage under the cycle lock: {0}")]
    Reload(#[source] KVStoreError),
}

fn describe_holder(holder: &Option<u32>) -> String {
    match holder {
        Some(pid) => format!(" in process {}", pid),
        None => String::new(),
    }
}
