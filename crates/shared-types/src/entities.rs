//! # Core Ledger Entities
//!
//! Account identifiers, assets, balances and account records as returned by
//! the ledger data provider.
//!
//! ## Clusters
//!
//! - **Identity**: `AccountId`
//! - **Assets**: `Asset`, `Balance`, well-known program assets
//! - **Accounts**: `LedgerAccount` (balances + on-ledger data entries)

use crate::amount::Amount;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Ledger-assigned account identifier (`G...` strkey). Opaque to the core.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for log lines: `GABCD...WXYZ1`.
    pub fn abbreviated(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 10 {
            return self.0.clone();
        }
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 5..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for AccountId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// CLUSTER B: ASSETS
// =============================================================================

/// A ledger asset: the native coin or a credit asset issued by an account.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Asset {
    Native,
    Credit { code: String, issuer: AccountId },
}

impl Asset {
    pub fn credit(code: impl Into<String>, issuer: impl Into<AccountId>) -> Self {
        Asset::Credit {
            code: code.into(),
            issuer: issuer.into(),
        }
    }

    /// Asset code (`XLM` for the native asset).
    pub fn code(&self) -> &str {
        match self {
            Asset::Native => "XLM",
            Asset::Credit { code, .. } => code,
        }
    }

    pub fn issuer(&self) -> Option<&AccountId> {
        match self {
            Asset::Native => None,
            Asset::Credit { issuer, .. } => Some(issuer),
        }
    }

    /// `CODE:ISSUER` or `native`, the form used in ledger queries.
    pub fn canonical(&self) -> String {
        match self {
            Asset::Native => "native".to_string(),
            Asset::Credit { code, issuer } => format!("{}:{}", code, issuer),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Assets of the recommendation program on the public network.
pub mod well_known {
    /// Aggregation token: balance encodes accumulated recommendation points.
    pub const MTLAP_CODE: &str = "MTLAP";
    pub const MTLAP_ISSUER: &str = "GCNVDZIHGX473FEI7IXCUAEXUJ4BGCKEMHF36VYP5EMS7PX2QBLAMTLA";

    /// Reward token paid out to recommenders.
    pub const LABR_CODE: &str = "LABR";
    pub const LABR_ISSUER: &str = "GA7I6SGUHQ26ARNCD376WXV5WSE7VJRX6OEFNFCEGRLFGZWQIV73LABR";

    /// Auxiliary token swapped into the reward token.
    pub const EURMTL_CODE: &str = "EURMTL";
    pub const EURMTL_ISSUER: &str = "GACKTN5DAZGWXRWB2WLM6OPBDHAMT6SJNGLJZPQMEZBUR4JUGBX2UK7V";

    use super::Asset;

    pub fn mtlap() -> Asset {
        Asset::credit(MTLAP_CODE, MTLAP_ISSUER)
    }

    pub fn labr() -> Asset {
        Asset::credit(LABR_CODE, LABR_ISSUER)
    }

    pub fn eurmtl() -> Asset {
        Asset::credit(EURMTL_CODE, EURMTL_ISSUER)
    }
}

/// A single balance line of an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub asset: Asset,
    pub amount: Amount,
}

// =============================================================================
// CLUSTER C: ACCOUNTS
// =============================================================================

/// An account record as enumerated from the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccount {
    pub account_id: AccountId,
    /// Current sequence number; the next transaction uses `sequence + 1`.
    pub sequence: i64,
    pub balances: Vec<Balance>,
    /// On-ledger data entries, values base64-encoded as stored by the ledger.
    pub data: BTreeMap<String, String>,
}

impl LedgerAccount {
    pub fn new(account_id: impl Into<AccountId>) -> Self {
        Self {
            account_id: account_id.into(),
            sequence: 0,
            balances: Vec::new(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_sequence(mut self, sequence: i64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_balance(mut self, asset: Asset, amount: Amount) -> Self {
        self.balances.push(Balance { asset, amount });
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Balance of `asset`, zero when the account holds no trustline for it.
    pub fn credit_balance(&self, asset: &Asset) -> Amount {
        self.balances
            .iter()
            .find(|b| &b.asset == asset)
            .map(|b| b.amount)
            .unwrap_or(Amount::ZERO)
    }

    /// Whether the account can receive `asset`.
    pub fn has_trustline(&self, asset: &Asset) -> bool {
        match asset {
            Asset::Native => true,
            Asset::Credit { .. } => self.balances.iter().any(|b| &b.asset == asset),
        }
    }

    /// Data entries whose key starts with `prefix`, in key order.
    pub fn data_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a String)> + 'a {
        self.data.iter().filter(move |(k, _)| k.starts_with(prefix))
    }
}
