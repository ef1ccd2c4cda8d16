//! # Service Container
//!
//! Configuration plus the wiring of the subsystems to their adapters.
//!
//! - One `HorizonClient` shared by every subsystem
//! - The report store backend is picked from `AppConfig::storage`

pub mod config;
pub mod services;

pub use config::{load_config, AppConfig, ConfigError, SigningSeed, StorageBackend};
pub use services::ServiceContainer;
