//! Domain invariants for the Distribution subsystem

use super::entities::DistributionPlan;
use mlm_01_recommendation_graph::RecommendationGraph;

/// Payouts never exceed the pool.
pub fn invariant_within_pool(plan: &DistributionPlan) -> bool {
    plan.distributes
        .iter()
        .try_fold(shared_types::Amount::ZERO, |acc, d| acc.checked_add(d.amount))
        .map(|total| total <= plan.pool)
        .unwrap_or(false)
}

/// Every payout is positive.
pub fn invariant_positive_payouts(plan: &DistributionPlan) -> bool {
    plan.distributes.iter().all(|d| d.amount.is_positive())
}

/// No delta is recorded for a conflicted recommended account.
pub fn invariant_conflicts_excluded(plan: &DistributionPlan, graph: &RecommendationGraph) -> bool {
    plan.deltas
        .iter()
        .all(|d| !graph.is_conflicted(&d.recommended))
}

/// Deltas sum to the total unit count.
pub fn invariant_units_balance(plan: &DistributionPlan) -> bool {
    plan.deltas.iter().map(|d| d.delta).sum::<i64>() == plan.total_units
}

/// Every conflict claimant of the graph has a conflict row.
pub fn invariant_conflict_rows_complete(
    plan: &DistributionPlan,
    graph: &RecommendationGraph,
) -> bool {
    let expected: usize = graph.conflicts.values().map(Vec::len).sum();
    plan.conflicts.len() == expected
}

pub fn check_all_invariants(plan: &DistributionPlan, graph: &RecommendationGraph) -> bool {
    invariant_within_pool(plan)
        && invariant_positive_payouts(plan)
        && invariant_conflicts_excluded(plan, graph)
        && invariant_units_balance(plan)
        && invariant_conflict_rows_complete(plan, graph)
}
