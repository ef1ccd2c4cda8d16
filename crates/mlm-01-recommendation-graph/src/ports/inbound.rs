//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::RecommendationGraph;
use crate::domain::errors::GraphError;
use async_trait::async_trait;
use shared_types::LedgerAccount;

/// Primary Recommendation Graph API
#[async_trait]
pub trait RecommendationGraphApi: Send + Sync {
    /// Enumerate every aggregation-token holder and build the graph.
    async fn current_graph(&self) -> Result<RecommendationGraph, GraphError>;

    /// Build the graph from an already enumerated account set. Pure.
    fn build_graph(&self, accounts: &[LedgerAccount]) -> RecommendationGraph;
}
