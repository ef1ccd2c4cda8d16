//! Domain invariants for the Recommendation Graph

use super::entities::RecommendationGraph;
use shared_types::AccountId;
use std::collections::{BTreeMap, BTreeSet};

/// Every conflict lists at least two distinct claimants, and each of them
/// actually carries the conflicted account in its recommended list.
pub fn invariant_conflicts_are_real(graph: &RecommendationGraph) -> bool {
    graph.conflicts.iter().all(|(target, claimants)| {
        let distinct: BTreeSet<&AccountId> = claimants.iter().collect();
        distinct.len() >= 2
            && distinct.len() == claimants.len()
            && claimants.iter().all(|c| {
                graph
                    .recommender(c)
                    .map(|r| r.recommended.iter().any(|rec| &rec.account_id == target))
                    .unwrap_or(false)
            })
    })
}

/// A recommended account claimed by more than one recommender is in the
/// conflict map; one claimed once is not.
pub fn invariant_single_claimant_or_conflict(graph: &RecommendationGraph) -> bool {
    let mut claims: BTreeMap<&AccountId, usize> = BTreeMap::new();
    for (_, rec) in graph.edges() {
        *claims.entry(&rec.account_id).or_default() += 1;
    }
    claims
        .iter()
        .all(|(target, count)| (*count > 1) == graph.is_conflicted(target))
}

/// `total_score` is the sum of every edge score.
pub fn invariant_total_score(graph: &RecommendationGraph) -> bool {
    graph.edges().map(|(_, rec)| rec.score).sum::<i64>() == graph.total_score
}

/// A recommender never lists the same account twice.
pub fn invariant_no_duplicate_edges(graph: &RecommendationGraph) -> bool {
    graph.recommenders.iter().all(|r| {
        let distinct: BTreeSet<&AccountId> = r.recommended.iter().map(|x| &x.account_id).collect();
        distinct.len() == r.recommended.len()
    })
}

/// Check every invariant at once.
pub fn check_all_invariants(graph: &RecommendationGraph) -> bool {
    invariant_conflicts_are_real(graph)
        && invariant_single_claimant_or_conflict(graph)
        && invariant_total_score(graph)
        && invariant_no_duplicate_edges(graph)
}
