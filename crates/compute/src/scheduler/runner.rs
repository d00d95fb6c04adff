use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use chrono::Utc;
use futures::FutureExt;
use tokio::sync::{watch, Semaphore};
use tracing::{debug, error, info};
use uuid::Uuid;

use matchday_core::config::SchedulerConfig;
use matchday_core::{Config, MatchId, Result};
use matchday_rules::{resolve_rule_set, RuleSet, RuleSetOverride, ScoringEngine};
use matchday_storage::{LineupSource, PredictionSource};

use crate::store::SharedScoreStore;

use super::job::{wait_terminal, JobRegistry, ScoringJob};
use super::metrics::SchedulerMetrics;
use super::types::{JobStatus, RunOutcome};

/// Re-scores every prediction of a match against its official lineup.
///
/// Cloning is cheap and every clone shares the same store, rule set and
/// in-flight job set. Runs for the same match are not serialized: if two
/// overlap, the last write per user wins.
#[derive(Clone)]
pub struct MatchScoringScheduler {
    store: SharedScoreStore,
    lineups: Arc<dyn LineupSource>,
    predictions: Arc<dyn PredictionSource>,
    rules: Arc<RwLock<RuleSet>>,
    jobs: Arc<JobRegistry>,
    permits: Arc<Semaphore>,
    metrics: Arc<RwLock<SchedulerMetrics>>,
}

impl MatchScoringScheduler {
    pub fn new(
        store: SharedScoreStore,
        lineups: Arc<dyn LineupSource>,
        predictions: Arc<dyn PredictionSource>,
        config: &SchedulerConfig,
        rules: RuleSet,
    ) -> Self {
        Self {
            store,
            lineups,
            predictions,
            rules: Arc::new(RwLock::new(rules)),
            jobs: Arc::new(JobRegistry::default()),
            permits: Arc::new(Semaphore::new(config.max_concurrent_jobs.max(1))),
            metrics: Arc::new(RwLock::new(SchedulerMetrics::default())),
        }
    }

    /// Build from process config, resolving the startup rule set from
    /// `SCORING_RULES_FILE` and `SCORING_RULES`.
    pub fn from_config(
        store: SharedScoreStore,
        lineups: Arc<dyn LineupSource>,
        predictions: Arc<dyn PredictionSource>,
        config: &Config,
    ) -> Self {
        let rules = resolve_rule_set(&config.scoring);
        Self::new(store, lineups, predictions, &config.scheduler, rules)
    }

    pub fn store(&self) -> &SharedScoreStore {
        &self.store
    }

    /// Rule set that the next run will snapshot.
    pub fn active_rules(&self) -> RuleSet {
        *self.rules.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the active rule set with `partial` merged over the defaults.
    ///
    /// Only runs that start afterwards see the change; recorded scores are
    /// left as they are.
    pub fn configure_scoring_rules(&self, partial: RuleSetOverride) -> RuleSet {
        let rules = partial.over_defaults();
        *self.rules.write().unwrap_or_else(PoisonError::into_inner) = rules;
        info!(
            points_per_matched_player = rules.points_per_matched_player,
            points_per_formation_match = rules.points_per_formation_match,
            full_lineup_bonus = rules.full_lineup_bonus,
            "scoring rules reconfigured"
        );
        rules
    }

    /// Score every prediction for `match_id` and record the results.
    ///
    /// Without an official lineup this is a no-op. All records written by one
    /// run share a single `calculated_at`. Predictions are processed in order
    /// and an error stops the run, leaving earlier records in place.
    pub async fn run_match_scoring(&self, match_id: &str) -> Result<RunOutcome> {
        let Some(lineup) = self.lineups.official_lineup(match_id).await? else {
            debug!(match_id = %match_id, "no official lineup yet, nothing to score");
            return Ok(RunOutcome::NoLineup);
        };

        let predictions = self.predictions.predictions_for_match(match_id).await?;
        let engine = ScoringEngine::new(self.active_rules());
        let calculated_at = Utc::now();

        for prediction in &predictions {
            let outcome = engine.score(prediction, &lineup);
            self.store.record_score(
                match_id,
                &prediction.user_id,
                outcome.points,
                outcome.breakdown,
                calculated_at,
            )?;
        }

        Ok(RunOutcome::Scored {
            scored: predictions.len(),
            calculated_at,
        })
    }

    /// Launch a scoring run for `match_id` in the background.
    ///
    /// The job is tracked as in flight from before it starts until it has
    /// finished, successfully or not. Must be called within a Tokio runtime.
    pub fn schedule_match_scoring(&self, match_id: impl Into<MatchId>) -> ScoringJob {
        let match_id = match_id.into();
        let id = Uuid::new_v4();
        let (tx, rx) = watch::channel(JobStatus::Queued);

        self.jobs.register(id, rx.clone());
        self.metrics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .record_scheduled();
        debug!(job_id = %id, match_id = %match_id, "scoring job scheduled");

        let scheduler = self.clone();
        let job_match_id = match_id.clone();
        tokio::spawn(async move {
            scheduler.execute_job(id, job_match_id, tx).await;
        });

        ScoringJob {
            match_id,
            status: rx,
        }
    }

    async fn execute_job(&self, id: Uuid, match_id: MatchId, status: watch::Sender<JobStatus>) {
        // The semaphore is never closed, so acquisition only fails if that changes.
        let _permit = Arc::clone(&self.permits).acquire_owned().await.ok();
        status.send_replace(JobStatus::Running);

        let start = Instant::now();
        let result = AssertUnwindSafe(self.run_match_scoring(&match_id))
            .catch_unwind()
            .await;

        let final_status = {
            let mut metrics = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
            match result {
                Ok(Ok(RunOutcome::Scored { scored, calculated_at })) => {
                    let duration = start.elapsed();
                    metrics.record_completed(&match_id, scored, calculated_at, duration);
                    info!(
                        job_id = %id,
                        match_id = %match_id,
                        scored = scored,
                        duration_ms = duration.as_millis() as u64,
                        "match scoring completed"
                    );
                    JobStatus::Completed
                }
                Ok(Ok(RunOutcome::NoLineup)) => {
                    metrics.record_skipped();
                    JobStatus::Completed
                }
                Ok(Err(e)) => {
                    metrics.record_failed();
                    error!(job_id = %id, match_id = %match_id, error = %e, "failed to score match");
                    JobStatus::Failed
                }
                Err(_) => {
                    metrics.record_failed();
                    error!(job_id = %id, match_id = %match_id, "scoring job panicked");
                    JobStatus::Failed
                }
            }
        };

        status.send_replace(final_status);
        self.jobs.deregister(id);
    }

    /// Wait for every job in flight at the time of this call.
    ///
    /// The set of jobs is captured immediately, before the returned future is
    /// first polled; jobs scheduled afterwards are not waited on.
    pub fn wait_for_scoring(&self) -> impl Future<Output = ()> + Send + 'static {
        let pending = self.jobs.snapshot();
        async move {
            debug!(jobs = pending.len(), "waiting for scoring jobs");
            for mut rx in pending {
                wait_terminal(&mut rx).await;
            }
        }
    }

    /// Number of jobs currently tracked as in flight.
    pub fn in_flight(&self) -> usize {
        self.jobs.len()
    }

    pub fn metrics(&self) -> SchedulerMetrics {
        self.metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
