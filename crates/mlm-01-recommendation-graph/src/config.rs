//! Configuration for the Recommendation Graph Subsystem

use crate::domain::value_objects::ClaimOrdering;
use serde::{Deserialize, Serialize};
use shared_types::entities::well_known;
use shared_types::{Amount, Asset};

/// Data-entry key prefix marking a recommendation claim.
pub const DEFAULT_RECOMMEND_TAG: &str = "RecommendToMTLA";

/// Minimum aggregation-token balance of an eligible recommender, in units.
pub const DEFAULT_MIN_RECOMMENDER_UNITS: i64 = 4;

/// Graph builder configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Prefix of the data entries that carry claims
    pub recommend_tag_prefix: String,
    /// Token whose balance gates recommenders and scores recommended accounts
    pub aggregation_asset: Asset,
    /// Recommenders below this balance are ignored entirely
    pub min_recommender_balance: Amount,
    /// Processing order for recommenders and their claims
    pub ordering: ClaimOrdering,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            recommend_tag_prefix: DEFAULT_RECOMMEND_TAG.to_string(),
            aggregation_asset: well_known::mtlap(),
            min_recommender_balance: Amount::from_units(DEFAULT_MIN_RECOMMENDER_UNITS),
            ordering: ClaimOrdering::default(),
        }
    }
}
