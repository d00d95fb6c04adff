//! Background match scoring with in-flight job tracking.
//!
//! Each call to [`MatchScoringScheduler::schedule_match_scoring`] becomes an
//! independent Tokio task that moves through
//! `Queued -> Running -> {Completed, Failed}`. Jobs are bounded by a
//! semaphore sized from `SCORING_MAX_CONCURRENT_JOBS`. Failed runs are not
//! retried; scores written before the failure stay recorded.

mod job;
pub mod metrics;
pub mod runner;
pub mod types;


pub use job::ScoringJob;
pub use metrics::SchedulerMetrics;
pub use runner::MatchScoringScheduler;
pub use types::{JobStatus, RunOutcome};
