//! # Runtime Configuration
//!
//! Aggregates the subsystem configurations and overrides them from the
//! environment (`MLM_*` variables, optionally from a `.env` file).
//!
//! ## Security Requirements
//!
//! - The signing seed is never printed; `Debug` redacts it.
//! - Commands that submit refuse to start unless the seed belongs to the
//!   operating account.

use horizon_adapter::{EnvelopeSigner, HorizonConfig};
use mlm_01_recommendation_graph::{ClaimOrdering, GraphConfig};
use mlm_02_distribution::DistributionConfig;
use mlm_03_token_swap::SwapConfig;
use serde::{Deserialize, Serialize};
use shared_types::strkey::decode_account_id;
use shared_types::AccountId;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_OPERATING_ACCOUNT: &str = "MLM_OPERATING_ACCOUNT";
pub const ENV_SIGNING_SEED: &str = "MLM_SIGNING_SEED";
pub const ENV_DATA_DIR: &str = "MLM_DATA_DIR";
pub const ENV_STORAGE: &str = "MLM_STORAGE";
pub const ENV_HORIZON_URL: &str = "MLM_HORIZON_URL";
pub const ENV_NETWORK_PASSPHRASE: &str = "MLM_NETWORK_PASSPHRASE";
pub const ENV_CLAIM_ORDERING: &str = "MLM_CLAIM_ORDERING";
pub const ENV_POOL_DIVISOR: &str = "MLM_POOL_DIVISOR";
pub const ENV_LOCK_TIMEOUT_SECS: &str = "MLM_LOCK_TIMEOUT_SECS";
pub const ENV_SWAP_PRICE_THRESHOLD: &str = "MLM_SWAP_PRICE_THRESHOLD";
pub const ENV_SWAP_SLIPPAGE_BPS: &str = "MLM_SWAP_SLIPPAGE_BPS";

/// Where reports are persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `<data_dir>/reports.db`
    #[default]
    File,
    /// `<data_dir>/reports.rocksdb`, requires the `rocksdb` feature
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            other => Err(format!("unknown storage backend {:?} (expected file or rocksdb)", other)),
        }
    }
}

/// Operating account secret seed (`S...`).
#[derive(Clone)]
pub struct SigningSeed(String);

impl SigningSeed {
    pub fn new(seed: impl Into<String>) -> Self {
        Self(seed.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSeed(***)")
    }
}

/// Complete runtime configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub operating_account: AccountId,
    pub signing_seed: Option<SigningSeed>,
    /// Holds the report store and the cycle lock file
    pub data_dir: PathBuf,
    pub storage: StorageBackend,
    pub horizon: HorizonConfig,
    pub graph: GraphConfig,
    pub distribution: DistributionConfig,
    pub swap: SwapConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            operating_account: AccountId::default(),
            signing_seed: None,
            data_dir: PathBuf::from("./data"),
            storage: StorageBackend::default(),
            horizon: HorizonConfig::default(),
            graph: GraphConfig::default(),
            distribution: DistributionConfig::default(),
            swap: SwapConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by whatever `lookup` returns. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(account) = get(ENV_OPERATING_ACCOUNT) {
            config.set_operating_account(AccountId::new(account));
        }
        config.signing_seed = get(ENV_SIGNING_SEED).map(SigningSeed::new);
        if let Some(dir) = get(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get(ENV_STORAGE) {
            config.storage = parse(ENV_STORAGE, &raw)?;
        }
        if let Some(url) = get(ENV_HORIZON_URL) {
            config.horizon.base_url = url;
        }
        if let Some(passphrase) = get(ENV_NETWORK_PASSPHRASE) {
            config.horizon.network_passphrase = passphrase;
        }
        if let Some(raw) = get(ENV_CLAIM_ORDERING) {
            config.graph.ordering = match raw.to_ascii_lowercase().as_str() {
                "canonical" => ClaimOrdering::Canonical,
                "enumeration" => ClaimOrdering::Enumeration,
                other => {
                    return Err(ConfigError::Invalid {
                        var: ENV_CLAIM_ORDERING,
                        reason: format!("{:?} is neither canonical nor enumeration", other),
                    })
                }
            };
        }
        if let Some(raw) = get(ENV_POOL_DIVISOR) {
            config.distribution.pool_divisor = parse(ENV_POOL_DIVISOR, &raw)?;
        }
        if let Some(raw) = get(ENV_LOCK_TIMEOUT_SECS) {
            config.distribution.lock_timeout_secs = parse(ENV_LOCK_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = get(ENV_SWAP_PRICE_THRESHOLD) {
            config.swap.price_threshold = parse(ENV_SWAP_PRICE_THRESHOLD, &raw)?;
        }
        if let Some(raw) = get(ENV_SWAP_SLIPPAGE_BPS) {
            config.swap.slippage_bps = parse(ENV_SWAP_SLIPPAGE_BPS, &raw)?;
        }

        Ok(config)
    }

    /// The operating account pays rewards and owns the swapped balances.
    pub fn set_operating_account(&mut self, account: AccountId) {
        self.distribution.operating_account = account.clone();
        self.swap.operating_account = account.clone();
        self.operating_account = account;
    }

    /// Check the configuration before any ledger call.
    ///
    /// `needs_signer` is set for commands that submit transactions.
    pub fn validate(&self, needs_signer: bool) -> Result<(), ConfigError> {
        if self.operating_account.as_str().is_empty() {
            return Err(ConfigError::Missing(ENV_OPERATING_ACCOUNT));
        }
        decode_account_id(self.operating_account.as_str()).map_err(|e| ConfigError::Invalid {
            var: ENV_OPERATING_ACCOUNT,
            reason: e.to_string(),
        })?;

        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing(ENV_DATA_DIR));
        }
        if self.storage == StorageBackend::RocksDb && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::BackendUnavailable(self.storage));
        }

        if self.distribution.pool_divisor <= 0 {
            return Err(ConfigError::Invalid {
                var: ENV_POOL_DIVISOR,
                reason: format!("must be positive, got {}", self.distribution.pool_divisor),
            });
        }
        if !(self.swap.price_threshold.is_finite() && self.swap.price_threshold > 0.0) {
            return Err(ConfigError::Invalid {
                var: ENV_SWAP_PRICE_THRESHOLD,
                reason: format!("must be a positive number, got {}", self.swap.price_threshold),
            });
        }
        if self.swap.slippage_bps >= 10_000 {
            return Err(ConfigError::Invalid {
                var: ENV_SWAP_SLIPPAGE_BPS,
                reason: format!("must be below 10000, got {}", self.swap.slippage_bps),
            });
        }

        if needs_signer {
            let seed = self
                .signing_seed
                .as_ref()
                .ok_or(ConfigError::Missing(ENV_SIGNING_SEED))?;
            let signer = EnvelopeSigner::from_seed(seed.expose()).map_err(|e| ConfigError::Invalid {
                var: ENV_SIGNING_SEED,
                reason: e.to_string(),
            })?;
            if signer.account_id() != &self.operating_account {
                return Err(ConfigError::SeedMismatch {
                    seed_account: signer.account_id().clone(),
                    operating_account: self.operating_account.clone(),
                });
            }
        }

        Ok(())
    }
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: format!("{:?}: {}", raw, e),
    })
}

/// Read `.env` if present, then the process environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    AppConfig::from_lookup(|key| std::env::var(key).ok())
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("Invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("Signing seed belongs to {seed_account}, not to the operating account {operating_account}")]
    SeedMismatch {
        seed_account: AccountId,
        operating_account: AccountId,
    },

    #[error("Storage backend {0:?} needs a build with the `rocksdb` feature")]
    BackendUnavailable(StorageBackend),
}
