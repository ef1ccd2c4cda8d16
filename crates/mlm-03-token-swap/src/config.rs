//! Configuration for the Token Swap Subsystem

use serde::{Deserialize, Serialize};
use shared_types::entities::well_known;
use shared_types::{AccountId, Asset};

/// Swaps are skipped when one reward token costs more than this many source
/// tokens.
pub const DEFAULT_PRICE_THRESHOLD: f64 = 25.0;

/// Accepted shortfall against the quoted output, in basis points (1%).
pub const DEFAULT_SLIPPAGE_BPS: u32 = 100;

/// Validity window of a swap transaction.
pub const DEFAULT_SWAP_TIMEOUT_SECS: u64 = 300;

/// Swap engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Account whose balances are converted, and which receives the output
    pub operating_account: AccountId,
    /// Token everything is converted into
    pub target_asset: Asset,
    /// Auxiliary tokens to convert, in processing order
    pub tokens: Vec<Asset>,
    pub price_threshold: f64,
    pub slippage_bps: u32,
    pub timeout_secs: u64,
    /// Fee per operation in stroops
    pub base_fee: u32,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            operating_account: AccountId::default(),
            target_asset: well_known::labr(),
            tokens: vec![well_known::eurmtl()],
            price_threshold: DEFAULT_PRICE_THRESHOLD,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            timeout_secs: DEFAULT_SWAP_TIMEOUT_SECS,
            base_fee: 1000,
        }
    }
}
