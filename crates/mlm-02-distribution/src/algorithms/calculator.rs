//! Distribution Calculator
//!
//! Splits the pool among recommenders in proportion to the score their
//! recommended accounts gained since the baseline. Pure, no I/O.
//!
//! Payouts are `floor(units * pool / total_units)` in stroops, computed in
//! 128-bit integers, so their sum never exceeds the pool.

use crate::domain::entities::{
    ConflictRow, DistributeRow, DistributionPlan, RecommendDelta, RecommendRow,
};
use crate::domain::value_objects::Baseline;
use mlm_01_recommendation_graph::RecommendationGraph;
use shared_types::{AccountId, Amount, Asset};
use std::collections::BTreeSet;

/// Unit contribution of one edge: its full score when new, its positive
/// increase otherwise.
fn contribution(prior: Option<i64>, score: i64) -> i64 {
    match prior {
        None => score.max(0),
        Some(prior) => (score - prior).max(0),
    }
}

/// Compute the payout plan for one cycle.
pub fn calculate_distribution(
    baseline: &Baseline,
    pool: Amount,
    reward_asset: &Asset,
    graph: &RecommendationGraph,
) -> DistributionPlan {
    // Pass 1: totals over non-conflicted edges
    let total_units: i64 = graph
        .edges()
        .filter(|(_, rec)| !graph.is_conflicted(&rec.account_id))
        .map(|(recommender, rec)| {
            contribution(baseline.prior_score(recommender, &rec.account_id), rec.score)
        })
        .fold(0i64, i64::saturating_add);

    let amount_per_unit = if total_units > 0 {
        pool.mul_div_floor(1, total_units).unwrap_or(Amount::ZERO)
    } else {
        Amount::ZERO
    };

    // Pass 2: allocation
    let mut plan = DistributionPlan {
        pool,
        distributes: Vec::new(),
        recommends: Vec::with_capacity(graph.edge_count()),
        conflicts: Vec::new(),
        deltas: Vec::new(),
        new_count: 0,
        level_up_count: 0,
        total_units,
        amount_per_unit,
    };

    for recommender in &graph.recommenders {
        let mut unit_count: i64 = 0;

        for rec in &recommender.recommended {
            plan.recommends.push(RecommendRow {
                recommender: recommender.account_id.clone(),
                recommended: rec.account_id.clone(),
                score: rec.score,
            });

            if graph.is_conflicted(&rec.account_id) {
                continue;
            }

            let prior = baseline.prior_score(&recommender.account_id, &rec.account_id);
            if prior.is_none() {
                plan.new_count += 1;
            }

            let delta = contribution(prior, rec.score);
            if delta > 0 {
                plan.level_up_count += 1;
                unit_count = unit_count.saturating_add(delta);
                plan.deltas.push(RecommendDelta {
                    recommender: recommender.account_id.clone(),
                    recommended: rec.account_id.clone(),
                    delta,
                });
            }
        }

        if unit_count == 0 || total_units == 0 {
            continue;
        }

        let amount = pool
            .mul_div_floor(unit_count, total_units)
            .unwrap_or(Amount::ZERO);
        if amount.is_positive() {
            plan.distributes.push(DistributeRow {
                recommender: recommender.account_id.clone(),
                asset: reward_asset.clone(),
                amount,
            });
        }
    }

    for (recommended, claimants) in &graph.conflicts {
        for claimant in claimants {
            plan.conflicts.push(ConflictRow {
                recommender: claimant.clone(),
                recommended: recommended.clone(),
            });
        }
    }

    plan
}

/// Rebuild the plan of a persisted report from its rows.
///
/// Deltas and counters are recomputed against `baseline`, the scores of the
/// report before it. The pool itself is not persisted, so the sum of the
/// stored payouts stands in for it.
pub fn plan_from_rows(
    baseline: &Baseline,
    recommends: Vec<RecommendRow>,
    distributes: Vec<DistributeRow>,
    conflicts: Vec<ConflictRow>,
) -> DistributionPlan {
    let conflicted: BTreeSet<&AccountId> = conflicts.iter().map(|c| &c.recommended).collect();

    let mut deltas = Vec::new();
    let mut new_count = 0;
    let mut level_up_count = 0;
    for row in recommends.iter().filter(|r| !conflicted.contains(&r.recommended)) {
        let prior = baseline.prior_score(&row.recommender, &row.recommended);
        if prior.is_none() {
            new_count += 1;
        }
        let delta = contribution(prior, row.score);
        if delta > 0 {
            level_up_count += 1;
            deltas.push(RecommendDelta {
                recommender: row.recommender.clone(),
                recommended: row.recommended.clone(),
                delta,
            });
        }
    }

    let total_units = deltas.iter().map(|d| d.delta).fold(0i64, i64::saturating_add);
    let pool = distributes
        .iter()
        .fold(Amount::ZERO, |acc, d| acc.saturating_add(d.amount));
    let amount_per_unit = if total_units > 0 {
        pool.mul_div_floor(1, total_units).unwrap_or(Amount::ZERO)
    } else {
        Amount::ZERO
    };

    DistributionPlan {
        pool,
        distributes,
        recommends,
        conflicts,
        deltas,
        new_count,
        level_up_count,
        total_units,
        amount_per_unit,
    }
}
