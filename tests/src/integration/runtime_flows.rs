//! # Runtime Flows
//!
//! The runtime's container, configured the way `main` configures it, run
//! against a mock Horizon and a file-backed report store in a temp dir.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use clap::Parser;

    use mlm_02_distribution::adapters::open_file_report_store;
    use mlm_02_distribution::ports::outbound::ReportStore;
    use mlm_02_distribution::CycleOptions;
    use mlm_runtime::commands::{execute, Cli};
    use mlm_runtime::container::config::{
        ENV_DATA_DIR, ENV_HORIZON_URL, ENV_OPERATING_ACCOUNT, ENV_SIGNING_SEED,
    };
    use mlm_runtime::{AppConfig, ServiceContainer};
    use shared_types::Amount;
    use std::time::Duration;
    use tempfile::TempDir;

    use crate::support::fixtures::{operator, operator_account, operator_seed, program_holders};
    use crate::support::MockHorizon;

    async fn program_horizon() -> MockHorizon {
        let horizon = MockHorizon::start().await;
        let holders = program_holders();
        horizon.holders(&holders).await;
        for account in &holders {
            horizon.account(account).await;
        }
        horizon.account(&operator_account()).await;
        horizon.accept_transactions("beef").await;
        horizon
    }

    fn config(horizon: &MockHorizon, dir: &TempDir) -> AppConfig {
        let env: HashMap<&str, String> = HashMap::from([
            (ENV_OPERATING_ACCOUNT, operator().to_string()),
            (ENV_SIGNING_SEED, operator_seed()),
            (ENV_DATA_DIR, dir.path().display().to_string()),
            (ENV_HORIZON_URL, horizon.url()),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        config.validate(true).unwrap();
        config
    }

    #[tokio::test]
    async fn test_report_create_then_distribute() {
        let horizon = program_horizon().await;
        let dir = TempDir::new().unwrap();
        let container = ServiceContainer::new(config(&horizon, &dir)).unwrap();

        let created = container
            .run_distribution(CycleOptions::create_report())
            .await
            .unwrap();
        assert!(created.report_id.is_some());
        assert!(created.submission_hash.is_none());
        assert!(horizon.submissions().await.is_empty());

        let distributed = container
            .run_distribution(CycleOptions::distribute())
            .await
            .unwrap();
        assert!(distributed.resumed);
        assert_eq!(distributed.report_id, created.report_id);
        assert_eq!(distributed.submission_hash.as_deref(), Some("beef"));
        assert_eq!(horizon.submissions().await.len(), 1);

        // Persisted under the data dir
        let store = open_file_report_store(dir.path(), Duration::from_secs(1)).unwrap();
        let reports = store.latest_reports(5).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].submission_hash.as_deref(), Some("beef"));
    }

    #[tokio::test]
    async fn test_dry_report_writes_nothing() {
        let horizon = program_horizon().await;
        let dir = TempDir::new().unwrap();
        let container = ServiceContainer::new(config(&horizon, &dir)).unwrap();

        let dry = container
            .run_distribution(CycleOptions::dry_run())
            .await
            .unwrap();
        assert_eq!(dry.report_id, None);
        assert_eq!(dry.plan.total_distributed(), Amount::from_units(100));

        let store = open_file_report_store(dir.path(), Duration::from_secs(1)).unwrap();
        assert!(store.latest_reports(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cli_command_runs_through_container() {
        let horizon = program_horizon().await;
        let dir = TempDir::new().unwrap();

        let cli = Cli::try_parse_from(["mlm-runtime", "report", "dry"]).unwrap();
        let mut config = config(&horizon, &dir);
        cli.apply_overrides(&mut config);
        let container = ServiceContainer::new(config).unwrap();

        execute(cli.command, &container).await.unwrap();
        assert!(horizon.submissions().await.is_empty());
    }
}
