//! # Commands
//!
//! Command line surface and one handler per command. Every handler logs a
//! summary and prints the full result as JSON on stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mlm_02_distribution::{CycleOptions, DistributionResult};
use mlm_03_token_swap::SwapSummary;
use serde::Serialize;
use tracing::{info, warn};

use crate::container::{AppConfig, ServiceContainer};

/// Recommendation reward distribution and reward-pool token swaps.
#[derive(Parser, Debug)]
#[command(name = "mlm-runtime")]
#[command(about = "Distribute recommendation rewards on the Stellar ledger")]
pub struct Cli {
    /// Directory holding the report store and the cycle lock (MLM_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Horizon endpoint (MLM_HORIZON_URL)
    #[arg(long, global = true)]
    pub horizon_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Compute or persist a report without paying out
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
    /// Resume or create a report, then sign and submit the payout
    Distribute,
    /// Convert auxiliary token balances into the reward token
    Swap,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    /// Compute the plan; nothing is written
    Dry,
    /// Compute and persist, or resume the pending report
    Create,
}

impl Command {
    /// Commands that submit transactions need the signing seed.
    pub fn needs_signer(&self) -> bool {
        matches!(self, Command::Distribute | Command::Swap)
    }

    pub fn cycle_options(&self) -> Option<CycleOptions> {
        match self {
            Command::Report {
                action: ReportAction::Dry,
            } => Some(CycleOptions::dry_run()),
            Command::Report {
                action: ReportAction::Create,
            } => Some(CycleOptions::create_report()),
            Command::Distribute => Some(CycleOptions::distribute()),
            Command::Swap => None,
        }
    }
}

impl Cli {
    /// Command line flags win over the environment.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(url) = &self.horizon_url {
            config.horizon.base_url = url.clone();
        }
    }
}

/// Run `command` against a validated configuration.
pub async fn execute(command: Command, container: &ServiceContainer) -> Result<()> {
    match command.cycle_options() {
        Some(options) => {
            let result = container.run_distribution(options).await?;
            log_distribution(&result);
            print_json(&result)
        }
        None => {
            let summary = container.run_swaps().await?;
            log_swaps(&summary);
            print_json(&summary)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode result")?;
    println!("{}", json);
    Ok(())
}

pub fn log_distribution(result: &DistributionResult) {
    let plan = &result.plan;
    info!(
        report_id = ?result.report_id,
        resumed = result.resumed,
        pool = %plan.pool,
        distributed = %plan.total_distributed(),
        recommenders = plan.distributes.len(),
        new = plan.new_count,
        leveled_up = plan.level_up_count,
        amount_per_unit = %plan.amount_per_unit,
        "Distribution cycle finished"
    );

    for conflict in &plan.conflicts {
        warn!(
            recommender = %conflict.recommender,
            recommended = %conflict.recommended,
            "Conflicting recommendation"
        );
    }
    for missing in &result.missing_trustlines {
        warn!(
            account = %missing.account_id,
            asset = %missing.asset.code(),
            "Recipient has no trustline"
        );
    }
    if let Some(hash) = &result.submission_hash {
        info!(hash = %hash, source = %result.source_address, "Payout submitted");
    }
}

pub fn log_swaps(summary: &SwapSummary) {
    if summary.is_empty() {
        info!("Nothing to swap");
        return;
    }

    for result in &summary.results {
        info!(
            from = %result.from_asset.code(),
            from_amount = %result.from_amount,
            to = %result.to_asset.code(),
            to_amount = %result.to_amount,
            price = result.price,
            hash = %result.tx_hash,
            "Swapped"
        );
    }
    for alert in &summary.alerts {
        warn!(
            asset = %alert.from_asset.code(),
            amount = %alert.from_amount,
            price = alert.price,
            threshold = alert.threshold,
            "Price above threshold, swap skipped"
        );
    }
    for error in &summary.errors {
        warn!(
            asset = %error.asset.code(),
            stage = %error.stage,
            message = %error.message,
            "Swap failed"
        );
    }
    info!(
        swaps = summary.results.len(),
        total_from = %summary.total_from,
        total_to = %summary.total_to,
        "Swaps finished"
    );
}
