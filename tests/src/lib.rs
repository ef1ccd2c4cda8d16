//! # MLM Rewards Test Suite
//!
//! Unified test crate for flows that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support/          # Program fixtures and a mock Horizon server
//! └── integration/      # Cross-subsystem flows
//!     ├── distribution_cycle.rs
//!     ├── horizon_flows.rs
//!     └── runtime_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mlm-tests
//! cargo test -p mlm-tests integration::horizon_flows
//! ```

#![allow(dead_code)]

pub mod integration;
pub mod support;
