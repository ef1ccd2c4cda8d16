//! Shared fixtures for the integration flows.

pub mod fixtures;
pub mod mock_horizon;

pub use mock_horizon::MockHorizon;
