//! Value objects for the Distribution subsystem

use super::entities::RecommendRow;
use serde::{Deserialize, Serialize};
use shared_types::AccountId;
use std::collections::BTreeMap;

/// Report identifier, assigned by the store in creation order.
pub type ReportId = i64;

/// What a cycle does after computing the plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleOptions {
    /// Build transfer instructions and persist the report
    pub persist_report: bool,
    /// Look up every payout recipient's trustline
    pub check_trustlines: bool,
    /// Sign, submit and record the transaction hash
    pub submit: bool,
}

impl CycleOptions {
    /// Compute only. Nothing is written.
    pub const fn dry_run() -> Self {
        Self {
            persist_report: false,
            check_trustlines: true,
            submit: false,
        }
    }

    /// Compute and persist, or resume the pending report.
    pub const fn create_report() -> Self {
        Self {
            persist_report: true,
            check_trustlines: true,
            submit: false,
        }
    }

    /// Resume-or-create, then submit.
    pub const fn distribute() -> Self {
        Self {
            persist_report: true,
            check_trustlines: true,
            submit: true,
        }
    }
}

/// Scores committed by the previous report:
/// recommender -> recommended -> score.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline(BTreeMap<AccountId, BTreeMap<AccountId, i64>>);

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: &[RecommendRow]) -> Self {
        let mut baseline = Self::new();
        for row in rows {
            baseline.insert(row.recommender.clone(), row.recommended.clone(), row.score);
        }
        baseline
    }

    pub fn insert(&mut self, recommender: AccountId, recommended: AccountId, score: i64) {
        self.0.entry(recommender).or_default().insert(recommended, score);
    }

    /// Score last committed for this edge, if the edge existed.
    pub fn prior_score(&self, recommender: &AccountId, recommended: &AccountId) -> Option<i64> {
        self.0.get(recommender).and_then(|m| m.get(recommended)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }
}
