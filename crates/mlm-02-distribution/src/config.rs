//! Configuration for the Distribution Subsystem

use serde::{Deserialize, Serialize};
use shared_types::entities::well_known;
use shared_types::{AccountId, Asset};
use std::time::Duration;

/// Memo prefix of payout transactions.
pub const DEFAULT_MEMO_PREFIX: &str = "mlta mlm";

/// The pool is this fraction of the operating account's reward balance.
pub const DEFAULT_POOL_DIVISOR: i64 = 3;

/// Fee per operation in stroops.
pub const DEFAULT_BASE_FEE: u32 = 1000;

/// Distribution configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Account paying the rewards
    pub operating_account: AccountId,
    /// Token paid out
    pub reward_asset: Asset,
    /// Pool = reward balance / divisor
    pub pool_divisor: i64,
    pub memo_prefix: String,
    pub base_fee: u32,
    /// How long to wait for a concurrent cycle to release the lock (seconds)
    pub lock_timeout_secs: u64,
}

impl DistributionConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs)
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            operating_account: AccountId::default(),
            reward_asset: well_known::labr(),
            pool_divisor: DEFAULT_POOL_DIVISOR,
            memo_prefix: DEFAULT_MEMO_PREFIX.to_string(),
            base_fee: DEFAULT_BASE_FEE,
            lock_timeout_secs: 30,
        }
    }
}
