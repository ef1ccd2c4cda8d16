//! Core entities for the Recommendation Graph

use serde::{Deserialize, Serialize};
use shared_types::AccountId;
use std::collections::BTreeMap;

/// An account endorsed by a recommender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedAccount {
    pub account_id: AccountId,
    /// Aggregation-token balance in whole units, truncated
    pub score: i64,
}

/// An eligible recommender and every account it resolved a claim on,
/// conflicted ones included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommender {
    pub account_id: AccountId,
    pub recommended: Vec<RecommendedAccount>,
}

/// Output of the graph builder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationGraph {
    /// Eligible recommenders in processing order
    pub recommenders: Vec<Recommender>,
    /// Conflicted account -> every recommender that claimed it, in claim order
    pub conflicts: BTreeMap<AccountId, Vec<AccountId>>,
    /// Sum of all resolved claim scores
    pub total_score: i64,
}

impl RecommendationGraph {
    pub fn is_conflicted(&self, account: &AccountId) -> bool {
        self.conflicts.contains_key(account)
    }

    pub fn recommender(&self, account: &AccountId) -> Option<&Recommender> {
        self.recommenders.iter().find(|r| &r.account_id == account)
    }

    /// Number of recommender -> recommended edges.
    pub fn edge_count(&self) -> usize {
        self.recommenders.iter().map(|r| r.recommended.len()).sum()
    }

    /// Iterate over every `(recommender, recommended)` edge.
    pub fn edges(&self) -> impl Iterator<Item = (&AccountId, &RecommendedAccount)> {
        self.recommenders
            .iter()
            .flat_map(|r| r.recommended.iter().map(move |rec| (&r.account_id, rec)))
    }
}
