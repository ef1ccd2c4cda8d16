//! Algorithms module for the Recommendation Graph
//!
//! Contains:
//! - Claim extraction and target decoding
//! - Graph building with first-seen-wins conflict detection

pub mod graph_builder;

pub use graph_builder::{build_recommendation_graph, decode_claim_target, extract_claims};
