//! Centralized Testing Utilities
//!
//! In-memory ledger and fixed clock shared by the subsystem crates' tests.
//! Available with the `test-utils` feature flag.

use crate::amount::Amount;
use crate::entities::{AccountId, Asset, LedgerAccount};
use crate::envelope::{self, PUBLIC_NETWORK_PASSPHRASE};
use crate::errors::LedgerError;
use crate::ledger::{LedgerDataProvider, TimeSource};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashSet};

/// A ledger held in memory.
///
/// Accounts are enumerated in insertion order so that tests can exercise
/// ordering-sensitive behavior. Submissions are recorded, not applied.
#[derive(Default)]
pub struct InMemoryLedger {
    accounts: RwLock<Vec<LedgerAccount>>,
    submitted: Mutex<Vec<String>>,
    reject_with: RwLock<Option<String>>,
    failing_lookups: RwLock<HashSet<AccountId>>,
    enumeration_fails: RwLock<bool>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account.
    pub fn upsert(&self, account: LedgerAccount) {
        let mut accounts = self.accounts.write();
        match accounts
            .iter_mut()
            .find(|a| a.account_id == account.account_id)
        {
            Some(existing) => *existing = account,
            None => accounts.push(account),
        }
    }

    /// Overwrite the balance of `asset` on an existing account.
    pub fn set_balance(&self, account: &AccountId, asset: &Asset, amount: Amount) {
        let mut accounts = self.accounts.write();
        if let Some(acc) = accounts.iter_mut().find(|a| &a.account_id == account) {
            match acc.balances.iter_mut().find(|b| &b.asset == asset) {
                Some(b) => b.amount = amount,
                None => acc.balances.push(crate::entities::Balance {
                    asset: asset.clone(),
                    amount,
                }),
            }
        }
    }

    /// Make every submission fail with the given ledger message.
    pub fn reject_submissions(&self, message: impl Into<String>) {
        *self.reject_with.write() = Some(message.into());
    }

    pub fn accept_submissions(&self) {
        *self.reject_with.write() = None;
    }

    /// Make detail lookups for `account` fail with a transport error.
    pub fn fail_lookups_for(&self, account: AccountId) {
        self.failing_lookups.write().insert(account);
    }

    pub fn fail_enumeration(&self, fail: bool) {
        *self.enumeration_fails.write() = fail;
    }

    /// Envelopes submitted so far.
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl LedgerDataProvider for InMemoryLedger {
    async fn accounts_holding(&self, asset: &Asset) -> Result<Vec<LedgerAccount>, LedgerError> {
        if *self.enumeration_fails.read() {
            return Err(LedgerError::Transport("enumeration unavailable".to_string()));
        }
        Ok(self
            .accounts
            .read()
            .iter()
            .filter(|a| a.has_trustline(asset))
            .cloned()
            .collect())
    }

    async fn account_detail(&self, account: &AccountId) -> Result<LedgerAccount, LedgerError> {
        if self.failing_lookups.read().contains(account) {
            return Err(LedgerError::Transport(format!("lookup of {} failed", account)));
        }
        self.accounts
            .read()
            .iter()
            .find(|a| &a.account_id == account)
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound(account.clone()))
    }

    async fn submit_transaction(&self, envelope_xdr: &str) -> Result<String, LedgerError> {
        if let Some(message) = self.reject_with.read().clone() {
            return Err(LedgerError::Rejected(message));
        }
        let tx = envelope::unsigned_transaction(envelope_xdr)?;
        self.submitted.lock().push(envelope_xdr.to_string());
        Ok(envelope::transaction_hash_hex(PUBLIC_NETWORK_PASSPHRASE, &tx)?)
    }
}

/// A time source that returns a fixed instant.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    now: DateTime<Utc>,
}

impl FixedTimeSource {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Midnight UTC of the given calendar day. Falls back to the unix epoch
    /// for an invalid date.
    pub fn on_date(year: i32, month: u32, day: u32) -> Self {
        let now = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| Utc.from_utc_datetime(&dt))
            .unwrap_or_default();
        Self { now }
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// A valid ledger address derived from a single repeated byte.
///
/// Needed wherever an account ends up in an encoded transaction.
pub fn test_account_id(seed: u8) -> AccountId {
    AccountId::new(crate::strkey::encode_account_id(&[seed; 32]))
}

/// Accounts keyed by id, for assertions.
pub fn index_accounts(accounts: &[LedgerAccount]) -> BTreeMap<AccountId, LedgerAccount> {
    accounts
        .iter()
        .map(|a| (a.account_id.clone(), a.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::well_known;

    #[test]
    fn test_fixed_time_source_returns_configured_day() {
        let clock = FixedTimeSource::on_date(2024, 3, 9);
        assert_eq!(clock.today().to_string(), "2024-03-09");
    }

    #[test]
    fn test_account_ids_are_valid_addresses() {
        let id = test_account_id(7);
        assert!(id.as_str().starts_with('G'));
        assert_eq!(crate::strkey::decode_account_id(id.as_str()).unwrap(), [7; 32]);
        assert_ne!(test_account_id(1), test_account_id(2));
    }

    #[tokio::test]
    async fn test_in_memory_ledger_enumerates_holders_only() {
        let ledger = InMemoryLedger::new();
        ledger.upsert(LedgerAccount::new("GA").with_balance(well_known::mtlap(), Amount::from_units(1)));
        ledger.upsert(LedgerAccount::new("GB").with_balance(well_known::labr(), Amount::from_units(1)));

        let holders = ledger.accounts_holding(&well_known::mtlap()).await.unwrap();
        assert_eq!(holders.len(), 1);
        assert_eq!(holders[0].account_id.as_str(), "GA");
    }

    #[tokio::test]
    async fn test_in_memory_ledger_rejects_when_configured() {
        let ledger = InMemoryLedger::new();
        ledger.reject_submissions("tx_bad_seq");
        let err = ledger.submit_transaction("AAAA").await.unwrap_err();
        assert_eq!(err, LedgerError::Rejected("tx_bad_seq".to_string()));
    }
}
