//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::DistributionResult;
use crate::domain::errors::DistributionError;
use crate::domain::value_objects::CycleOptions;
use async_trait::async_trait;

/// Primary Distribution API
#[async_trait]
pub trait DistributionApi: Send + Sync {
    /// Run one distribution cycle.
    ///
    /// Holds the cycle lock for the whole call. A pending report is resumed
    /// rather than recomputed; otherwise a fresh plan is calculated against
    /// the most recent report's scores.
    async fn run_cycle(&self, options: CycleOptions) -> Result<DistributionResult, DistributionError>;
}
