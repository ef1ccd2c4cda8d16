//! # Ledger Data Provider Port
//!
//! The single outbound seam between the subsystems and the ledger. The
//! concrete implementation (`horizon-adapter`) handles pagination, signing and
//! transport; subsystems only see complete, deduplicated results.

use crate::amount::Amount;
use crate::entities::{AccountId, Asset, LedgerAccount};
use crate::errors::LedgerError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Read and submit access to the ledger.
#[async_trait]
pub trait LedgerDataProvider: Send + Sync {
    /// Every account holding a trustline for `asset`, across all pages,
    /// deduplicated by account id.
    async fn accounts_holding(&self, asset: &Asset) -> Result<Vec<LedgerAccount>, LedgerError>;

    /// Full record of a single account.
    async fn account_detail(&self, account: &AccountId) -> Result<LedgerAccount, LedgerError>;

    /// Balance of `asset` on `account`; zero when the trustline is missing.
    async fn credit_balance(
        &self,
        account: &AccountId,
        asset: &Asset,
    ) -> Result<Amount, LedgerError> {
        Ok(self.account_detail(account).await?.credit_balance(asset))
    }

    /// Whether `account` can receive `asset`.
    async fn has_trustline(&self, account: &AccountId, asset: &Asset) -> Result<bool, LedgerError> {
        Ok(self.account_detail(account).await?.has_trustline(asset))
    }

    /// Sign and submit an unsigned base64 envelope. Returns the transaction hash.
    async fn submit_transaction(&self, envelope_xdr: &str) -> Result<String, LedgerError>;
}

/// Clock abstraction so that memos and report timestamps are testable.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
