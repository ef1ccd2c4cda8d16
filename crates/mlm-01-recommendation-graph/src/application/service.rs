//! Recommendation Graph Service
//!
//! Main service implementing RecommendationGraphApi.

use crate::algorithms::build_recommendation_graph;
use crate::config::GraphConfig;
use crate::domain::entities::RecommendationGraph;
use crate::domain::errors::GraphError;
use crate::ports::inbound::RecommendationGraphApi;
use crate::ports::outbound::LedgerDataProvider;
use async_trait::async_trait;
use shared_types::LedgerAccount;
use std::sync::Arc;
use tracing::info;

/// Recommendation Graph Service
///
/// 1. Enumerate aggregation-token holders through the ledger provider
/// 2. Resolve claims into the graph
pub struct RecommendationGraphService<L: LedgerDataProvider> {
    ledger: Arc<L>,
    config: GraphConfig,
}

impl<L: LedgerDataProvider> RecommendationGraphService<L> {
    /// Create a new service with default config
    pub fn new(ledger: Arc<L>) -> Self {
        Self::with_config(ledger, GraphConfig::default())
    }

    /// Create a new service with custom config
    pub fn with_config(ledger: Arc<L>, config: GraphConfig) -> Self {
        Self { ledger, config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }
}

#[async_trait]
impl<L: LedgerDataProvider> RecommendationGraphApi for RecommendationGraphService<L> {
    async fn current_graph(&self) -> Result<RecommendationGraph, GraphError> {
        if self.config.recommend_tag_prefix.is_empty() {
            return Err(GraphError::InvalidConfig(
                "recommend tag prefix must not be empty".to_string(),
            ));
        }

        let accounts = self
            .ledger
            .accounts_holding(&self.config.aggregation_asset)
            .await?;

        let graph = self.build_graph(&accounts);

        info!(
            holders = accounts.len(),
            recommenders = graph.recommenders.len(),
            edges = graph.edge_count(),
            conflicts = graph.conflicts.len(),
            total_score = graph.total_score,
            "[mlm-01] Recommendation graph built"
        );

        Ok(graph)
    }

    fn build_graph(&self, accounts: &[LedgerAccount]) -> RecommendationGraph {
        build_recommendation_graph(accounts, &self.config)
    }
}
