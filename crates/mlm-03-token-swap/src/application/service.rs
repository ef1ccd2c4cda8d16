//! Token Swap Service
//!
//! Main service implementing SwapApi.

use crate::algorithms::{swap_memo, SwapPlan};
use crate::config::SwapConfig;
use crate::domain::entities::{PriceExceededAlert, StrictSendOrder, SwapResult, SwapSummary};
use crate::domain::errors::{SwapEngineError, SwapFailure};
use crate::domain::value_objects::SwapStage;
use crate::ports::inbound::SwapApi;
use crate::ports::outbound::{LedgerDataProvider, SwapLedger, TimeSource};
use async_trait::async_trait;
use shared_types::{Amount, Asset, TimeBounds};
use std::sync::Arc;
use tracing::{info, warn};

/// Token Swap Service
///
/// For each configured token with a positive balance, in order:
/// 1. Quote one source unit into the target token
/// 2. Skip with an alert when the price is above the threshold
/// 3. Otherwise convert the whole balance with a slippage floor
pub struct SwapService<L, T>
where
    L: LedgerDataProvider + SwapLedger,
    T: TimeSource,
{
    ledger: Arc<L>,
    clock: Arc<T>,
    config: SwapConfig,
}

impl<L, T> SwapService<L, T>
where
    L: LedgerDataProvider + SwapLedger,
    T: TimeSource,
{
    /// Create a new service with default config
    pub fn new(ledger: Arc<L>, clock: Arc<T>) -> Self {
        Self::with_config(ledger, clock, SwapConfig::default())
    }

    /// Create a new service with custom config
    pub fn with_config(ledger: Arc<L>, clock: Arc<T>, config: SwapConfig) -> Self {
        Self {
            ledger,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// Positive balances of the configured tokens, in configuration order.
    async fn swappable_balances(&self) -> Result<Vec<(Asset, Amount)>, SwapEngineError> {
        let account = self
            .ledger
            .account_detail(&self.config.operating_account)
            .await
            .map_err(|source| SwapEngineError::BalanceLookup {
                account: self.config.operating_account.clone(),
                source,
            })?;

        Ok(self
            .config
            .tokens
            .iter()
            .map(|token| (token.clone(), account.credit_balance(token)))
            .filter(|(_, balance)| balance.is_positive())
            .collect())
    }

    /// Destination per one unit of `token`, from the best path.
    async fn quote(&self, token: &Asset) -> Result<Amount, SwapFailure> {
        let paths = self
            .ledger
            .strict_send_paths(token, Amount::from_units(1), &self.config.target_asset)
            .await?;

        let best = paths.into_iter().next().ok_or_else(|| shared_types::LedgerError::NoPath {
            from: token.code().to_string(),
            to: self.config.target_asset.code().to_string(),
        })?;

        if !best.destination_amount.is_positive() {
            return Err(SwapFailure::ZeroQuote {
                asset: token.clone(),
            });
        }
        Ok(best.destination_amount)
    }

    fn order(&self, token: &Asset, balance: Amount, minimum: Amount) -> StrictSendOrder {
        let now = self.clock.now().timestamp().max(0) as u64;
        StrictSendOrder {
            account: self.config.operating_account.clone(),
            send_asset: token.clone(),
            send_amount: balance,
            dest_asset: self.config.target_asset.clone(),
            dest_min: minimum,
            memo: swap_memo(token.code(), self.config.target_asset.code(), self.clock.today()),
            time_bounds: TimeBounds::timeout(now, self.config.timeout_secs),
            base_fee: self.config.base_fee,
        }
    }

    async fn swap_token(&self, summary: &mut SwapSummary, token: &Asset, balance: Amount) {
        let quote = match self.quote(token).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!(asset = %token.canonical(), error = %e, "[mlm-03] Price quote failed");
                summary.record_error(token, SwapStage::GetPrice, e.to_string());
                return;
            }
        };

        let plan = SwapPlan::decide(
            balance,
            quote,
            self.config.price_threshold,
            self.config.slippage_bps,
        );
        let (price, minimum) = match plan {
            Some(SwapPlan::Execute { price, minimum, .. }) => (price, minimum),
            Some(SwapPlan::Skip { price }) => {
                warn!(
                    asset = %token.canonical(),
                    price,
                    threshold = self.config.price_threshold,
                    "[mlm-03] Price above threshold, swap skipped"
                );
                summary.record_alert(PriceExceededAlert {
                    from_asset: token.clone(),
                    from_amount: balance,
                    price,
                    threshold: self.config.price_threshold,
                });
                return;
            }
            Some(SwapPlan::Unfillable { price }) => {
                let e = SwapFailure::OutputTooSmall {
                    asset: token.clone(),
                    balance,
                };
                warn!(asset = %token.canonical(), price, error = %e, "[mlm-03] Swap not attempted");
                summary.record_error(token, SwapStage::GetPrice, e.to_string());
                return;
            }
            None => {
                let e = SwapFailure::ZeroQuote {
                    asset: token.clone(),
                };
                summary.record_error(token, SwapStage::GetPrice, e.to_string());
                return;
            }
        };

        let order = self.order(token, balance, minimum);
        match self.ledger.execute_strict_send(&order).await {
            Ok(receipt) => {
                info!(
                    asset = %token.canonical(),
                    from = %balance,
                    to = %receipt.destination_amount,
                    price,
                    hash = %receipt.hash,
                    "[mlm-03] Swap executed"
                );
                summary.record_success(SwapResult {
                    from_asset: token.clone(),
                    from_amount: balance,
                    to_asset: self.config.target_asset.clone(),
                    to_amount: receipt.destination_amount,
                    min_to_amount: minimum,
                    tx_hash: receipt.hash,
                    price,
                });
            }
            Err(e) => {
                warn!(asset = %token.canonical(), error = %e, "[mlm-03] Swap failed");
                summary.record_error(token, SwapStage::Swap, e.to_string());
            }
        }
    }
}

#[async_trait]
impl<L, T> SwapApi for SwapService<L, T>
where
    L: LedgerDataProvider + SwapLedger,
    T: TimeSource,
{
    async fn execute_swaps(&self) -> Result<SwapSummary, SwapEngineError> {
        let balances = self.swappable_balances().await?;
        let mut summary = SwapSummary::default();

        for (token, balance) in &balances {
            self.swap_token(&mut summary, token, *balance).await;
        }

        info!(
            tokens = balances.len(),
            swaps = summary.results.len(),
            alerts = summary.alerts.len(),
            errors = summary.errors.len(),
            total_from = %summary.total_from,
            total_to = %summary.total_to,
            "[mlm-03] Swaps finished"
        );

        Ok(summary)
    }
}
