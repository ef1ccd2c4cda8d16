//! # Error Types
//!
//! Defines error types used across subsystems.

use crate::entities::AccountId;
use thiserror::Error;

/// Errors from parsing a ledger amount string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Empty amount")]
    Empty,

    #[error("Invalid amount: {0:?}")]
    Invalid(String),

    /// More fractional digits than the ledger supports.
    #[error("Amount {value:?} has more than {max_decimals} decimals")]
    TooPrecise { value: String, max_decimals: usize },

    #[error("Amount out of range: {0:?}")]
    Overflow(String),
}

/// Errors from decoding a ledger key string (`G...` / `S...`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrKeyError {
    #[error("Invalid strkey length: {0}")]
    InvalidLength(usize),

    /// Bad alphabet, wrong version byte or checksum mismatch
    #[error("Not a valid {expected} strkey")]
    Invalid { expected: &'static str },
}

/// Errors from encoding or decoding a transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("Invalid account id {account}: {source}")]
    InvalidAccount {
        account: String,
        #[source]
        source: StrKeyError,
    },

    #[error("Invalid asset code: {0:?}")]
    InvalidAssetCode(String),

    #[error("Memo text is {len} bytes, maximum is {max}")]
    MemoTooLong { len: usize, max: usize },

    #[error("Transaction has {count} operations, allowed 1..={max}")]
    OperationCount { count: usize, max: usize },

    #[error("Conversion path has {len} hops, maximum is {max}")]
    PathTooLong { len: usize, max: usize },

    #[error("Fee overflow: base fee {base_fee} x {operations} operations")]
    FeeOverflow { base_fee: u32, operations: usize },

    #[error("Malformed envelope: {0}")]
    Malformed(String),

    #[error("XDR encoding failed: {0}")]
    Encoding(String),
}

/// Errors returned by the ledger data provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Network or protocol failure talking to the ledger.
    #[error("Ledger request failed: {0}")]
    Transport(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// The ledger answered with something we could not interpret.
    #[error("Malformed ledger response: {0}")]
    Malformed(String),

    /// Transaction rejected by the ledger. The message is the ledger's own.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("No conversion path found for {from} -> {to}")]
    NoPath { from: String, to: String },

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}
