//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::SwapSummary;
use crate::domain::errors::SwapEngineError;
use async_trait::async_trait;

/// Primary Token Swap API
#[async_trait]
pub trait SwapApi: Send + Sync {
    /// Convert every configured token balance into the target token.
    ///
    /// Per-token failures and price alerts end up in the summary; only a
    /// failed balance lookup fails the call.
    async fn execute_swaps(&self) -> Result<SwapSummary, SwapEngineError>;
}
