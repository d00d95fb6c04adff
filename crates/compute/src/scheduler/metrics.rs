use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use matchday_core::MatchId;

/// Scoring run counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerMetrics {
    pub jobs_scheduled: u64,
    /// Runs that scored a lineup.
    pub jobs_completed: u64,
    /// Runs that found no official lineup.
    pub jobs_skipped: u64,
    pub jobs_failed: u64,
    pub predictions_scored: u64,
    /// Last successful scoring pass per match.
    pub last_run: HashMap<MatchId, DateTime<Utc>>,
    /// Rolling mean over completed runs.
    pub avg_run_duration: Duration,
}

impl SchedulerMetrics {
    pub fn record_scheduled(&mut self) {
        self.jobs_scheduled += 1;
    }

    pub fn record_completed(
        &mut self,
        match_id: &str,
        scored: usize,
        calculated_at: DateTime<Utc>,
        duration: Duration,
    ) {
        self.jobs_completed += 1;
        self.predictions_scored += scored as u64;
        self.last_run.insert(match_id.to_string(), calculated_at);

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let count = self.jobs_completed;
        self.avg_run_duration = if count == 1 {
            duration
        } else {
            let prev_nanos = self.avg_run_duration.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };
    }

    pub fn record_skipped(&mut self) {
        self.jobs_skipped += 1;
    }

    pub fn record_failed(&mut self) {
        self.jobs_failed += 1;
    }

    /// Runs that reached a terminal status.
    pub fn jobs_finished(&self) -> u64 {
        self.jobs_completed + self.jobs_skipped + self.jobs_failed
    }
}
