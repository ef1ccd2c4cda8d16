//! # Cross-Subsystem Integration
//!
//! - `distribution_cycle`: mlm-01 → mlm-02 over the file report store
//! - `horizon_flows`: distribution and swaps through the Horizon adapter
//! - `runtime_flows`: the runtime container and CLI commands

pub mod distribution_cycle;
pub mod horizon_flows;
pub mod runtime_flows;
