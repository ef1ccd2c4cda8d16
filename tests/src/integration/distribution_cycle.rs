//! # Distribution Cycle Flows
//!
//! mlm-01 graph building feeding mlm-02 cycles over the file-backed report
//! store, across several cycles and simulated restarts.
//!
//! ## Flows Tested
//!
//! 1. **Fresh then incremental**: the second cycle only pays score gained
//!    since the first report.
//! 2. **Rejected submission**: the report stays pending, survives a restart,
//!    and is resumed unchanged.
//! 3. **Conflicts**: a contested account pays nobody.
//! 4. **Lock contention**: a cycle waits for the lock, then gives up.
//! 5. **Two processes**: stores opened on one data dir before either cycle
//!    runs still see each other's reports once the lock is held.

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use mlm_01_recommendation_graph::RecommendationGraphService;
    use mlm_02_distribution::adapters::{open_file_report_store, FileBackedKVStore, FileCycleLock};
    use mlm_02_distribution::ports::outbound::ReportStore;
    use mlm_02_distribution::{
        CycleOptions, DistributionApi, DistributionConfig, DistributionError, DistributionService,
        KvReportStore, LockError,
    };
    use shared_types::entities::well_known;
    use shared_types::envelope::unsigned_transaction;
    use shared_types::testing::{FixedTimeSource, InMemoryLedger};
    use shared_types::Amount;
    use tempfile::TempDir;

    use crate::support::fixtures::{
        operator, operator_account, program_holders, recommender, recommender_account, user,
    };

    type FileStore = KvReportStore<FileBackedKVStore, FileCycleLock>;
    type Service = DistributionService<
        InMemoryLedger,
        RecommendationGraphService<InMemoryLedger>,
        FileStore,
        FixedTimeSource,
    >;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn program_ledger() -> Arc<InMemoryLedger> {
        let ledger = InMemoryLedger::new();
        ledger.upsert(operator_account());
        for account in program_holders() {
            ledger.upsert(account);
        }
        Arc::new(ledger)
    }

    fn open_store(dir: &Path) -> Arc<FileStore> {
        Arc::new(open_file_report_store(dir, Duration::from_millis(200)).unwrap())
    }

    fn service(ledger: &Arc<InMemoryLedger>, store: &Arc<FileStore>) -> Service {
        let graph = Arc::new(RecommendationGraphService::new(ledger.clone()));
        DistributionService::with_config(
            ledger.clone(),
            graph,
            store.clone(),
            Arc::new(FixedTimeSource::on_date(2024, 6, 1)),
            DistributionConfig {
                operating_account: operator(),
                ..DistributionConfig::default()
            },
        )
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_fresh_cycle_then_incremental_cycle() {
        let dir = TempDir::new().unwrap();
        let ledger = program_ledger();
        let store = open_store(dir.path());

        let first = service(&ledger, &store)
            .run_cycle(CycleOptions::distribute())
            .await
            .unwrap();
        assert_eq!(first.plan.new_count, 2);
        assert_eq!(first.plan.total_units, 30);
        assert_eq!(first.plan.distributes.len(), 1);
        assert_eq!(first.plan.distributes[0].recommender, recommender(1));
        assert_eq!(first.plan.distributes[0].amount, Amount::from_units(100));
        assert!(first.submission_hash.is_some());
        assert_eq!(ledger.submitted(), vec![first.envelope_xdr.clone()]);

        // One recommended account gains 15 MTLAP
        ledger.set_balance(&user(1), &well_known::mtlap(), Amount::from_units(25));

        let second = service(&ledger, &store)
            .run_cycle(CycleOptions::distribute())
            .await
            .unwrap();
        assert!(!second.resumed);
        assert_eq!(second.plan.new_count, 0);
        assert_eq!(second.plan.level_up_count, 1);
        assert_eq!(second.plan.total_units, 15);
        assert_eq!(second.plan.deltas.len(), 1);
        assert_eq!(second.plan.deltas[0].recommended, user(1));
        assert!(second.report_id > first.report_id);

        let reports = store.latest_reports(10).await.unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| !r.is_pending()));
        assert_eq!(reports[0].submission_hash, second.submission_hash);
    }

    #[tokio::test]
    async fn test_unchanged_scores_have_nothing_to_distribute() {
        let dir = TempDir::new().unwrap();
        let ledger = program_ledger();
        let store = open_store(dir.path());

        service(&ledger, &store)
            .run_cycle(CycleOptions::distribute())
            .await
            .unwrap();

        let dry = service(&ledger, &store)
            .run_cycle(CycleOptions::dry_run())
            .await
            .unwrap();
        assert_eq!(dry.plan.amount_per_unit, Amount::ZERO);
        assert!(dry.plan.distributes.is_empty());

        let err = service(&ledger, &store)
            .run_cycle(CycleOptions::create_report())
            .await
            .unwrap_err();
        assert!(matches!(err, DistributionError::NoDistributes));
        assert_eq!(store.latest_reports(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_submission_is_resumed_after_restart() {
        let dir = TempDir::new().unwrap();
        let ledger = program_ledger();
        ledger.reject_submissions("tx_bad_seq");

        let pending_id = {
            let store = open_store(dir.path());
            let err = service(&ledger, &store)
                .run_cycle(CycleOptions::distribute())
                .await
                .unwrap_err();
            assert!(matches!(err, DistributionError::SubmissionFailed(ref m) if m == "tx_bad_seq"));

            let pending = store.pending_report().await.unwrap().unwrap();
            pending.id
        };

        // New process: scores moved, the ledger accepts again
        ledger.accept_submissions();
        ledger.set_balance(&user(2), &well_known::mtlap(), Amount::from_units(90));
        let store = open_store(dir.path());

        let resumed = service(&ledger, &store)
            .run_cycle(CycleOptions::distribute())
            .await
            .unwrap();
        assert!(resumed.resumed);
        assert_eq!(resumed.report_id, Some(pending_id));
        assert_eq!(resumed.plan.total_units, 30);
        assert_eq!(resumed.plan.distributes[0].amount, Amount::from_units(100));
        assert!(store.pending_report().await.unwrap().is_none());

        let submitted = ledger.submitted();
        assert_eq!(submitted.len(), 1);
        assert!(unsigned_transaction(&submitted[0]).is_ok());
    }

    #[tokio::test]
    async fn test_contested_account_pays_nobody() {
        let dir = TempDir::new().unwrap();
        let ledger = program_ledger();
        // A second recommender also claims user 2
        ledger.upsert(recommender_account(2, &[user(2)]));
        let store = open_store(dir.path());

        let result = service(&ledger, &store)
            .run_cycle(CycleOptions::create_report())
            .await
            .unwrap();

        assert_eq!(result.plan.total_units, 10);
        assert_eq!(result.plan.distributes.len(), 1);
        assert_eq!(result.plan.distributes[0].recommender, recommender(1));
        assert_eq!(result.plan.distributes[0].amount, Amount::from_units(100));
        assert_eq!(result.plan.conflicts.len(), 2);
        assert!(result.plan.conflicts.iter().all(|c| c.recommended == user(2)));

        let id = result.report_id.unwrap();
        assert_eq!(store.report_conflicts(id).await.unwrap(), result.plan.conflicts);
    }

    #[tokio::test]
    async fn test_second_process_sees_first_process_payout() {
        let dir = TempDir::new().unwrap();
        let ledger = program_ledger();
        // Both opened before either cycle runs
        let first_store = open_store(dir.path());
        let second_store = open_store(dir.path());

        let first = service(&ledger, &first_store)
            .run_cycle(CycleOptions::distribute())
            .await
            .unwrap();
        assert!(first.submission_hash.is_some());

        let err = service(&ledger, &second_store)
            .run_cycle(CycleOptions::distribute())
            .await
            .unwrap_err();
        assert!(matches!(err, DistributionError::NoDistributes));
        assert_eq!(ledger.submitted().len(), 1);

        let reports = open_store(dir.path()).latest_reports(10).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, first.report_id.unwrap());
        assert_eq!(reports[0].submission_hash, first.submission_hash);
    }

    #[tokio::test]
    async fn test_second_process_resumes_first_process_report() {
        let dir = TempDir::new().unwrap();
        let ledger = program_ledger();
        let first_store = open_store(dir.path());
        let second_store = open_store(dir.path());

        let created = service(&ledger, &first_store)
            .run_cycle(CycleOptions::create_report())
            .await
            .unwrap();

        let distributed = service(&ledger, &second_store)
            .run_cycle(CycleOptions::distribute())
            .await
            .unwrap();
        assert!(distributed.resumed);
        assert_eq!(distributed.report_id, created.report_id);
        assert_eq!(ledger.submitted(), vec![created.envelope_xdr.clone()]);

        let reports = open_store(dir.path()).latest_reports(10).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert!(!reports[0].is_pending());
    }

    #[tokio::test]
    async fn test_held_lock_blocks_a_second_cycle() {
        let dir = TempDir::new().unwrap();
        let ledger = program_ledger();
        let holder = open_store(dir.path());
        let contender = open_store(dir.path());

        let guard = holder.lock_cycle().await.unwrap();
        let err = service(&ledger, &contender)
            .run_cycle(CycleOptions::dry_run())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DistributionError::Lock(LockError::AlreadyLocked { .. })
        ));

        drop(guard);
        assert!(service(&ledger, &contender)
            .run_cycle(CycleOptions::dry_run())
            .await
            .is_ok());
    }
}
