//! Application layer: the distribution cycle.

pub mod service;
