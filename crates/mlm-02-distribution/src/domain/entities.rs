//! Core entities for the Distribution subsystem

use super::value_objects::ReportId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Amount, Asset};

// =============================================================================
// PERSISTED ROWS
// =============================================================================

/// Score of a recommended account at report time. Next cycle's baseline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendRow {
    pub recommender: AccountId,
    pub recommended: AccountId,
    pub score: i64,
}

/// Payout to one recommender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributeRow {
    pub recommender: AccountId,
    pub asset: Asset,
    pub amount: Amount,
}

/// One claimant of a conflicted recommended account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRow {
    pub recommender: AccountId,
    pub recommended: AccountId,
}

/// Report header.
///
/// Immutable once stored, except for the late-bound submission hash. A
/// report without a hash is pending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    /// Unsigned base64 transaction envelope
    pub envelope_xdr: String,
    pub created_at: DateTime<Utc>,
    pub submission_hash: Option<String>,
}

impl Report {
    pub fn is_pending(&self) -> bool {
        self.submission_hash.is_none()
    }
}

/// Everything written by one atomic report creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewReport {
    pub envelope_xdr: String,
    pub created_at: DateTime<Utc>,
    pub recommends: Vec<RecommendRow>,
    pub distributes: Vec<DistributeRow>,
    pub conflicts: Vec<ConflictRow>,
}

// =============================================================================
// CALCULATION OUTPUT
// =============================================================================

/// Positive score increase of one edge since the baseline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendDelta {
    pub recommender: AccountId,
    pub recommended: AccountId,
    pub delta: i64,
}

/// Result of the distribution calculation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionPlan {
    /// Pool split in this cycle
    pub pool: Amount,
    /// Non-zero payouts, in recommender processing order
    pub distributes: Vec<DistributeRow>,
    /// Every resolved edge with its current score, conflicted ones included
    pub recommends: Vec<RecommendRow>,
    pub conflicts: Vec<ConflictRow>,
    pub deltas: Vec<RecommendDelta>,
    /// Edges with no baseline entry
    pub new_count: u64,
    /// Edges with a positive delta (new edges included)
    pub level_up_count: u64,
    pub total_units: i64,
    /// `pool / total_units` truncated to stroops. Display only.
    pub amount_per_unit: Amount,
}

impl DistributionPlan {
    pub fn total_distributed(&self) -> Amount {
        self.distributes
            .iter()
            .fold(Amount::ZERO, |acc, d| acc.saturating_add(d.amount))
    }

    pub fn is_empty(&self) -> bool {
        self.distributes.is_empty()
    }
}

/// A payout recipient that cannot receive the reward asset yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingTrustline {
    pub account_id: AccountId,
    pub asset: Asset,
}

/// Outcome of one cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionResult {
    /// Set when a report was persisted or resumed
    pub report_id: Option<ReportId>,
    pub created_at: DateTime<Utc>,
    /// Unsigned base64 envelope; empty for a dry run
    pub envelope_xdr: String,
    pub plan: DistributionPlan,
    pub missing_trustlines: Vec<MissingTrustline>,
    pub source_address: AccountId,
    pub submission_hash: Option<String>,
    /// The pending report was reused rather than recomputed
    pub resumed: bool,
}
