//! # Horizon Flows
//!
//! The subsystems driven through `HorizonClient` against a mock Horizon:
//! real HTTP, real signing, real envelope encoding.
//!
//! ## Flows Tested
//!
//! 1. **Distribute**: holders page → graph → plan → signed payout POSTed
//! 2. **Rejection**: Horizon's result codes reach `SubmissionFailed`
//! 3. **Swap**: balance → 1-unit quote → strict-send at the full amount
//! 4. **Price gate**: an expensive quote produces an alert and no POST

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use horizon_adapter::{EnvelopeSigner, HorizonClient, HorizonConfig};
    use mlm_01_recommendation_graph::RecommendationGraphService;
    use mlm_02_distribution::adapters::in_memory_report_store;
    use mlm_02_distribution::ports::outbound::ReportStore;
    use mlm_02_distribution::{
        CycleOptions, DistributionApi, DistributionConfig, DistributionError, DistributionService,
    };
    use mlm_03_token_swap::{SwapApi, SwapConfig, SwapService, SwapStage};
    use shared_types::entities::well_known;
    use shared_types::envelope::unsigned_transaction;
    use shared_types::testing::FixedTimeSource;
    use shared_types::Amount;

    use crate::support::fixtures::{operator, operator_account, operator_seed, program_holders};
    use crate::support::mock_horizon::{page_json, strict_send_page};
    use crate::support::MockHorizon;

    fn client(horizon: &MockHorizon) -> Arc<HorizonClient> {
        let config = HorizonConfig {
            base_url: horizon.url(),
            ..HorizonConfig::default()
        };
        let signer = EnvelopeSigner::from_seed(&operator_seed()).unwrap();
        Arc::new(HorizonClient::new(config).unwrap().with_signer(signer))
    }

    async fn program_horizon() -> MockHorizon {
        let horizon = MockHorizon::start().await;
        let holders = program_holders();
        horizon.holders(&holders).await;
        for account in &holders {
            horizon.account(account).await;
        }
        horizon.account(&operator_account()).await;
        horizon
    }

    // =============================================================================
    // DISTRIBUTION
    // =============================================================================

    #[tokio::test]
    async fn test_distribute_submits_signed_payout() {
        let horizon = program_horizon().await;
        horizon.accept_transactions("c0ffee").await;
        let ledger = client(&horizon);
        let store = Arc::new(in_memory_report_store());

        let service = DistributionService::with_config(
            ledger.clone(),
            Arc::new(RecommendationGraphService::new(ledger.clone())),
            store.clone(),
            Arc::new(FixedTimeSource::on_date(2024, 6, 1)),
            DistributionConfig {
                operating_account: operator(),
                lock_timeout_secs: 1,
                ..DistributionConfig::default()
            },
        );
        let result = service.run_cycle(CycleOptions::distribute()).await.unwrap();

        assert_eq!(result.submission_hash.as_deref(), Some("c0ffee"));
        assert_eq!(result.plan.pool, Amount::from_units(100));
        assert!(store.pending_report().await.unwrap().is_none());

        let submissions = horizon.submissions().await;
        assert_eq!(submissions.len(), 1);
        // Signed: the unsigned-envelope decoder refuses it
        assert!(unsigned_transaction(&submissions[0]).is_err());
        assert!(BASE64.decode(&submissions[0]).unwrap().len() > BASE64.decode(&result.envelope_xdr).unwrap().len());

        let requests = horizon.requests().await;
        let listing = requests
            .iter()
            .find(|r| r.url.path() == "/accounts")
            .unwrap();
        let query: HashMap<String, String> = listing.url.query_pairs().into_owned().collect();
        assert!(query["asset"].starts_with("MTLAP:"));
        assert_eq!(query["limit"], "200");
    }

    #[tokio::test]
    async fn test_horizon_rejection_keeps_report_pending() {
        let horizon = program_horizon().await;
        horizon.reject_transactions("tx_insufficient_fee").await;
        let ledger = client(&horizon);
        let store = Arc::new(in_memory_report_store());

        let service = DistributionService::with_config(
            ledger.clone(),
            Arc::new(RecommendationGraphService::new(ledger.clone())),
            store.clone(),
            Arc::new(FixedTimeSource::on_date(2024, 6, 1)),
            DistributionConfig {
                operating_account: operator(),
                ..DistributionConfig::default()
            },
        );
        let err = service.run_cycle(CycleOptions::distribute()).await.unwrap_err();

        match err {
            DistributionError::SubmissionFailed(message) => {
                assert!(message.contains("tx_insufficient_fee"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.pending_report().await.unwrap().is_some());
    }

    // =============================================================================
    // SWAP
    // =============================================================================

    fn swap_service(ledger: Arc<HorizonClient>) -> SwapService<HorizonClient, FixedTimeSource> {
        SwapService::with_config(
            ledger,
            Arc::new(FixedTimeSource::on_date(2024, 6, 1)),
            SwapConfig {
                operating_account: operator(),
                ..SwapConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_swap_converts_balance_below_threshold() {
        let horizon = MockHorizon::start().await;
        horizon.account(&operator_account()).await;
        // 1 EURMTL -> 0.05 LABR: price 20, under the 25 threshold
        horizon
            .paths_for(
                Amount::from_units(1),
                strict_send_page(
                    &well_known::eurmtl(),
                    Amount::from_units(1),
                    &well_known::labr(),
                    Amount::parse("0.05").unwrap(),
                ),
            )
            .await;
        horizon
            .paths_for(
                Amount::from_units(100),
                strict_send_page(
                    &well_known::eurmtl(),
                    Amount::from_units(100),
                    &well_known::labr(),
                    Amount::parse("4.99").unwrap(),
                ),
            )
            .await;
        horizon.accept_transactions("5a5a").await;

        let summary = swap_service(client(&horizon)).execute_swaps().await.unwrap();

        assert!(summary.errors.is_empty(), "{:?}", summary.errors);
        assert_eq!(summary.results.len(), 1);
        let swap = &summary.results[0];
        assert_eq!(swap.from_amount, Amount::from_units(100));
        assert_eq!(swap.min_to_amount, Amount::parse("4.95").unwrap());
        assert_eq!(swap.to_amount, Amount::parse("4.99").unwrap());
        assert_eq!(swap.tx_hash, "5a5a");
        assert_eq!(summary.total_to, Amount::parse("4.99").unwrap());
        assert_eq!(horizon.submissions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_swap_above_threshold_is_an_alert() {
        let horizon = MockHorizon::start().await;
        horizon.account(&operator_account()).await;
        // 1 EURMTL -> 0.02 LABR: price 50
        horizon
            .paths(strict_send_page(
                &well_known::eurmtl(),
                Amount::from_units(1),
                &well_known::labr(),
                Amount::parse("0.02").unwrap(),
            ))
            .await;

        let summary = swap_service(client(&horizon)).execute_swaps().await.unwrap();

        assert!(summary.results.is_empty());
        assert!(summary.errors.is_empty());
        assert_eq!(summary.alerts.len(), 1);
        assert!((summary.alerts[0].price - 50.0).abs() < 1e-9);
        assert!(horizon.submissions().await.is_empty());
    }

    #[tokio::test]
    async fn test_swap_without_paths_is_a_price_error() {
        let horizon = MockHorizon::start().await;
        horizon.account(&operator_account()).await;
        horizon.paths(page_json(Vec::new(), None)).await;

        let summary = swap_service(client(&horizon)).execute_swaps().await.unwrap();

        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].stage, SwapStage::GetPrice);
        assert!(summary.results.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_operating_account_aborts_swaps() {
        let horizon = MockHorizon::start().await;
        let config = HorizonConfig {
            base_url: horizon.url(),
            request_timeout_secs: 2,
            ..HorizonConfig::default()
        };
        // No route for the operating account: 404
        let ledger = Arc::new(HorizonClient::new(config).unwrap());

        assert!(swap_service(ledger).execute_swaps().await.is_err());
    }
}
