//! # MLM-01: Recommendation Graph Subsystem
//!
//! Turns raw ledger account records into the recommendation graph: which
//! eligible recommenders endorse which accounts, each endorsed account's
//! score, and which accounts are claimed by more than one recommender.
//!
//! ## Architecture
//!
//! - **Domain**: `Recommender`, `RecommendedAccount`, `RecommendationGraph`
//! - **Algorithms**: claim extraction, eligibility gate, conflict resolution
//! - **Ports**: Inbound (`RecommendationGraphApi`), Outbound (`LedgerDataProvider`)
//! - **Application**: `RecommendationGraphService` (fetch + build)
//!
//! ## Invariants
//!
//! - A recommended account with two or more claimants is a conflict for all
//!   purposes; it is never partially attributed.
//! - Recommenders below the balance gate are dropped with all their claims
//!   and never show up as conflict claimants.

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use algorithms::build_recommendation_graph;
pub use application::service::RecommendationGraphService;
pub use config::GraphConfig;
pub use domain::entities::*;
pub use domain::errors::GraphError;
pub use domain::value_objects::*;
pub use ports::inbound::RecommendationGraphApi;
