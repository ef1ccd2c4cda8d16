//! Distribution Service
//!
//! Main service implementing DistributionApi.

use crate::algorithms::{
    build_transfer_instructions, calculate_distribution, plan_from_rows, InstructionParams,
};
use crate::config::DistributionConfig;
use crate::domain::entities::{
    DistributionPlan, DistributionResult, MissingTrustline, NewReport, Report,
};
use crate::domain::errors::DistributionError;
use crate::domain::invariants::check_all_invariants;
use crate::domain::value_objects::{Baseline, CycleOptions};
use crate::ports::inbound::DistributionApi;
use crate::ports::outbound::{LedgerDataProvider, RecommendationGraphApi, ReportStore, TimeSource};
use async_trait::async_trait;
use shared_types::{Amount, LedgerError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Distribution Service
///
/// One cycle, under the cycle lock:
/// 1. Resume the pending report, or
/// 2. Compute a fresh plan against the latest report's scores and, when
///    asked, persist it with its transfer instructions
/// 3. Check payout trustlines
/// 4. Submit and record the hash
pub struct DistributionService<L, G, S, T>
where
    L: LedgerDataProvider,
    G: RecommendationGraphApi,
    S: ReportStore,
    T: TimeSource,
{
    ledger: Arc<L>,
    graph: Arc<G>,
    store: Arc<S>,
    clock: Arc<T>,
    config: DistributionConfig,
}

impl<L, G, S, T> DistributionService<L, G, S, T>
where
    L: LedgerDataProvider,
    G: RecommendationGraphApi,
    S: ReportStore,
    T: TimeSource,
{
    /// Create a new service with default config
    pub fn new(ledger: Arc<L>, graph: Arc<G>, store: Arc<S>, clock: Arc<T>) -> Self {
        Self::with_config(ledger, graph, store, clock, DistributionConfig::default())
    }

    /// Create a new service with custom config
    pub fn with_config(
        ledger: Arc<L>,
        graph: Arc<G>,
        store: Arc<S>,
        clock: Arc<T>,
        config: DistributionConfig,
    ) -> Self {
        Self {
            ledger,
            graph,
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    /// Scores committed by the most recent report before `before`, or by the
    /// most recent report overall.
    async fn baseline(&self, before: Option<Report>) -> Result<Baseline, DistributionError> {
        let previous = match before {
            Some(report) => self
                .store
                .latest_reports(2)
                .await?
                .into_iter()
                .find(|r| r.id < report.id),
            None => self.store.latest_reports(1).await?.into_iter().next(),
        };

        match previous {
            Some(report) => {
                let rows = self.store.report_recommends(report.id).await?;
                debug!(report_id = report.id, edges = rows.len(), "[mlm-02] Baseline loaded");
                Ok(Baseline::from_rows(&rows))
            }
            None => Ok(Baseline::new()),
        }
    }

    /// This cycle's pool: the operating account's reward balance over the
    /// configured divisor.
    async fn pool(&self) -> Result<Amount, DistributionError> {
        let balance = self
            .ledger
            .credit_balance(&self.config.operating_account, &self.config.reward_asset)
            .await?;
        let pool = balance
            .div_floor(self.config.pool_divisor)
            .unwrap_or(Amount::ZERO);

        if !pool.is_positive() {
            return Err(DistributionError::NoBalance {
                account: self.config.operating_account.clone(),
            });
        }
        Ok(pool)
    }

    /// Rebuild the result of a persisted, unsubmitted report.
    async fn resume(&self, report: Report) -> Result<DistributionResult, DistributionError> {
        let recommends = self.store.report_recommends(report.id).await?;
        let distributes = self.store.report_distributes(report.id).await?;
        let conflicts = self.store.report_conflicts(report.id).await?;
        let baseline = self.baseline(Some(report.clone())).await?;

        let plan = plan_from_rows(&baseline, recommends, distributes, conflicts);

        info!(
            report_id = report.id,
            distributes = plan.distributes.len(),
            total = %plan.total_distributed(),
            "[mlm-02] Resuming pending report"
        );

        Ok(DistributionResult {
            report_id: Some(report.id),
            created_at: report.created_at,
            envelope_xdr: report.envelope_xdr,
            plan,
            missing_trustlines: Vec::new(),
            source_address: self.config.operating_account.clone(),
            submission_hash: None,
            resumed: true,
        })
    }

    /// Calculate a new plan and persist it when `persist` is set.
    async fn compute(&self, persist: bool) -> Result<DistributionResult, DistributionError> {
        let baseline = self.baseline(None).await?;
        let pool = self.pool().await?;
        let graph = self.graph.current_graph().await?;

        let plan = calculate_distribution(&baseline, pool, &self.config.reward_asset, &graph);
        debug_assert!(check_all_invariants(&plan, &graph));

        info!(
            pool = %plan.pool,
            total_units = plan.total_units,
            amount_per_unit = %plan.amount_per_unit,
            new = plan.new_count,
            level_up = plan.level_up_count,
            distributes = plan.distributes.len(),
            conflicts = graph.conflicts.len(),
            "[mlm-02] Distribution calculated"
        );

        let mut result = DistributionResult {
            report_id: None,
            created_at: self.clock.now(),
            envelope_xdr: String::new(),
            plan,
            missing_trustlines: Vec::new(),
            source_address: self.config.operating_account.clone(),
            submission_hash: None,
            resumed: false,
        };

        if !persist {
            return Ok(result);
        }

        if result.plan.is_empty() {
            return Err(DistributionError::NoDistributes);
        }

        let source = self
            .ledger
            .account_detail(&self.config.operating_account)
            .await?;
        let params = InstructionParams {
            memo_prefix: &self.config.memo_prefix,
            base_fee: self.config.base_fee,
            date: self.clock.today(),
        };
        result.envelope_xdr = build_transfer_instructions(&source, &result.plan.distributes, &params)?;

        let report = self
            .store
            .create_report(NewReport {
                envelope_xdr: result.envelope_xdr.clone(),
                created_at: result.created_at,
                recommends: result.plan.recommends.clone(),
                distributes: result.plan.distributes.clone(),
                conflicts: result.plan.conflicts.clone(),
            })
            .await?;
        result.report_id = Some(report.id);

        Ok(result)
    }

    /// Payout recipients that cannot receive their asset yet.
    async fn missing_trustlines(
        &self,
        plan: &DistributionPlan,
    ) -> Result<Vec<MissingTrustline>, DistributionError> {
        let mut missing = Vec::new();

        for payout in &plan.distributes {
            let trusted = self
                .ledger
                .has_trustline(&payout.recommender, &payout.asset)
                .await
                .map_err(|source| DistributionError::TrustlineCheckFailed {
                    account: payout.recommender.clone(),
                    source,
                })?;

            if !trusted {
                warn!(
                    account = %payout.recommender,
                    asset = %payout.asset.canonical(),
                    "[mlm-02] Payout recipient has no trustline"
                );
                missing.push(MissingTrustline {
                    account_id: payout.recommender.clone(),
                    asset: payout.asset.clone(),
                });
            }
        }

        Ok(missing)
    }

    async fn submit(&self, result: &mut DistributionResult) -> Result<(), DistributionError> {
        let Some(report_id) = result.report_id else {
            return Ok(());
        };

        let hash = self
            .ledger
            .submit_transaction(&result.envelope_xdr)
            .await
            .map_err(|e| match e {
                LedgerError::Rejected(message) => DistributionError::SubmissionFailed(message),
                other => DistributionError::SubmissionFailed(other.to_string()),
            })?;

        self.store.set_report_hash(report_id, &hash).await?;
        info!(report_id, hash = %hash, "[mlm-02] Distribution submitted");

        result.submission_hash = Some(hash);
        Ok(())
    }
}

#[async_trait]
impl<L, G, S, T> DistributionApi for DistributionService<L, G, S, T>
where
    L: LedgerDataProvider,
    G: RecommendationGraphApi,
    S: ReportStore,
    T: TimeSource,
{
    async fn run_cycle(&self, options: CycleOptions) -> Result<DistributionResult, DistributionError> {
        let _guard = self.store.lock_cycle().await?;
        // Submitting needs a stored report to attach the hash to
        let persist = options.persist_report || options.submit;

        let mut result = match self.store.pending_report().await? {
            Some(report) => self.resume(report).await?,
            None => self.compute(persist).await?,
        };

        if options.check_trustlines {
            result.missing_trustlines = self.missing_trustlines(&result.plan).await?;
        }

        if options.submit {
            self.submit(&mut result).await?;
        }

        Ok(result)
    }
}
