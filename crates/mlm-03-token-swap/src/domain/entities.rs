//! Core entities for the Token Swap subsystem

use super::value_objects::SwapStage;
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Amount, Asset, TimeBounds};

// =============================================================================
// LEDGER EXCHANGE
// =============================================================================

/// One conversion path found by the ledger for a strict-send amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathQuote {
    pub source_asset: Asset,
    pub source_amount: Amount,
    pub destination_asset: Asset,
    pub destination_amount: Amount,
    /// Intermediate assets, excluding source and destination
    pub path: Vec<Asset>,
}

/// Convert exactly `send_amount` into at least `dest_min`, paid back to
/// `account`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrictSendOrder {
    pub account: AccountId,
    pub send_asset: Asset,
    pub send_amount: Amount,
    pub dest_asset: Asset,
    pub dest_min: Amount,
    pub memo: String,
    pub time_bounds: TimeBounds,
    /// Fee per operation in stroops
    pub base_fee: u32,
}

/// What the ledger reports back for an executed order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrictSendReceipt {
    pub hash: String,
    /// Output quoted for the full amount on the path that was used
    pub destination_amount: Amount,
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// A completed conversion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwapResult {
    pub from_asset: Asset,
    pub from_amount: Amount,
    pub to_asset: Asset,
    pub to_amount: Amount,
    pub min_to_amount: Amount,
    pub tx_hash: String,
    /// Source tokens per reward token
    pub price: f64,
}

/// The price was above the threshold; the balance was left alone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceExceededAlert {
    pub from_asset: Asset,
    pub from_amount: Amount,
    pub price: f64,
    pub threshold: f64,
}

/// A failed attempt for one token. Other tokens are still processed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapError {
    pub asset: Asset,
    pub stage: SwapStage,
    pub message: String,
}

/// Outcome of one `execute_swaps` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SwapSummary {
    pub results: Vec<SwapResult>,
    pub alerts: Vec<PriceExceededAlert>,
    pub errors: Vec<SwapError>,
    /// Sum of converted source amounts, successful swaps only
    pub total_from: Amount,
    /// Sum of received amounts, successful swaps only
    pub total_to: Amount,
}

impl SwapSummary {
    pub fn record_success(&mut self, result: SwapResult) {
        self.total_from = self.total_from.saturating_add(result.from_amount);
        self.total_to = self.total_to.saturating_add(result.to_amount);
        self.results.push(result);
    }

    pub fn record_alert(&mut self, alert: PriceExceededAlert) {
        self.alerts.push(alert);
    }

    pub fn record_error(&mut self, asset: &Asset, stage: SwapStage, message: impl Into<String>) {
        self.errors.push(SwapError {
            asset: asset.clone(),
            stage,
            message: message.into(),
        });
    }

    /// Nothing was attempted: no balances to convert.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.alerts.is_empty() && self.errors.is_empty()
    }
}
