//! Value objects for the Recommendation Graph

use serde::{Deserialize, Serialize};
use shared_types::AccountId;

/// Order in which recommenders and their claims are processed.
///
/// First-seen-wins conflict detection does not depend on the order, but the
/// order of claimants inside a conflict record and of recommenders in the
/// output does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimOrdering {
    /// Recommenders by account id, claims by data key. Reproducible.
    #[default]
    Canonical,
    /// As enumerated by the ledger provider.
    Enumeration,
}

/// A single recommendation claim read from a recommender's data entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    /// Data entry key (`RecommendToMTLA`, `RecommendToMTLA2`, ...)
    pub key: String,
    /// Decoded target account id
    pub target: AccountId,
}
