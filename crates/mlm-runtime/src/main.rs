//! # MLM Runtime
//!
//! Runs one command and exits:
//!
//! ```text
//! mlm-runtime report dry       # compute the plan, write nothing
//! mlm-runtime report create    # persist the report (or resume the pending one)
//! mlm-runtime distribute       # persist, sign, submit, record the hash
//! mlm-runtime swap             # convert auxiliary tokens into the reward token
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Parse the command line
//! 2. Install the tracing subscriber (`RUST_LOG`, default `info`)
//! 3. Load configuration from `.env` and `MLM_*` variables, apply flags
//! 4. Validate (the seed is required for commands that submit)
//! 5. Build the service container and run the command

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mlm_runtime::commands::{self, Cli};
use mlm_runtime::container::{load_config, ServiceContainer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON result
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = load_config().context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config
        .validate(cli.command.needs_signer())
        .context("Invalid configuration")?;

    info!(
        command = ?cli.command,
        account = %config.operating_account,
        data_dir = %config.data_dir.display(),
        "Starting MLM runtime"
    );

    let container = ServiceContainer::new(config)?;
    commands::execute(cli.command, &container).await
}
