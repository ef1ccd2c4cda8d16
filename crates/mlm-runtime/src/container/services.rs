//! # Service Container
//!
//! Builds the ledger adapter once and hands it to every subsystem.
//!
//! ```text
//! HorizonClient ──→ RecommendationGraphService ──→ DistributionService ←── ReportStore
//!       │                                                                 (file | rocksdb)
//!       └─────────→ SwapService
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use horizon_adapter::{EnvelopeSigner, HorizonClient};
use mlm_01_recommendation_graph::RecommendationGraphService;
use mlm_02_distribution::adapters::open_file_report_store;
use mlm_02_distribution::ports::outbound::ReportStore;
use mlm_02_distribution::{CycleOptions, DistributionApi, DistributionResult, DistributionService};
use mlm_03_token_swap::{SwapApi, SwapService, SwapSummary};
use shared_types::SystemTimeSource;
use tracing::{info, instrument};

use crate::container::config::{AppConfig, StorageBackend};

/// Recommendation graph read through Horizon.
pub type HorizonGraphService = RecommendationGraphService<HorizonClient>;

/// Holds the shared ledger client and the configuration.
pub struct ServiceContainer {
    pub ledger: Arc<HorizonClient>,
    pub config: AppConfig,
}

impl ServiceContainer {
    /// Build the Horizon client, with a signer when a seed is configured.
    #[instrument(name = "container_init", skip(config))]
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut ledger =
            HorizonClient::new(config.horizon.clone()).context("Failed to build Horizon client")?;
        if let Some(seed) = &config.signing_seed {
            let signer = EnvelopeSigner::from_seed(seed.expose()).context("Failed to load signing seed")?;
            info!(account = %signer.account_id(), "Signing enabled");
            ledger = ledger.with_signer(signer);
        }
        info!(horizon = %config.horizon.base_url, "Ledger client ready");

        Ok(Self {
            ledger: Arc::new(ledger),
            config,
        })
    }

    pub fn graph_service(&self) -> Arc<HorizonGraphService> {
        Arc::new(RecommendationGraphService::with_config(
            Arc::clone(&self.ledger),
            self.config.graph.clone(),
        ))
    }

    pub fn swap_service(&self) -> SwapService<HorizonClient, SystemTimeSource> {
        SwapService::with_config(
            Arc::clone(&self.ledger),
            Arc::new(SystemTimeSource),
            self.config.swap.clone(),
        )
    }

    /// One distribution cycle against the configured report store.
    pub async fn run_distribution(&self, options: CycleOptions) -> Result<DistributionResult> {
        let data_dir = &self.config.data_dir;
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;
        let lock_timeout = self.config.distribution.lock_timeout();

        match self.config.storage {
            StorageBackend::File => {
                let store = open_file_report_store(data_dir, lock_timeout)
                    .context("Failed to open report store")?;
                self.run_cycle_with(Arc::new(store), options).await
            }
            #[cfg(feature = "rocksdb")]
            StorageBackend::RocksDb => {
                let store = crate::adapters::storage::open_rocksdb_report_store(data_dir, lock_timeout)
                    .context("Failed to open RocksDB report store")?;
                self.run_cycle_with(Arc::new(store), options).await
            }
            #[cfg(not(feature = "rocksdb"))]
            StorageBackend::RocksDb => {
                anyhow::bail!("RocksDB storage needs a build with the `rocksdb` feature")
            }
        }
    }

    /// One distribution cycle against `store`.
    pub async fn run_cycle_with<S: ReportStore>(
        &self,
        store: Arc<S>,
        options: CycleOptions,
    ) -> Result<DistributionResult> {
        let service = DistributionService::with_config(
            Arc::clone(&self.ledger),
            self.graph_service(),
            store,
            Arc::new(SystemTimeSource),
            self.config.distribution.clone(),
        );

        service
            .run_cycle(options)
            .await
            .context("Distribution cycle failed")
    }

    pub async fn run_swaps(&self) -> Result<SwapSummary> {
        self.swap_service()
            .execute_swaps()
            .await
            .context("Token swap failed")
    }
}
