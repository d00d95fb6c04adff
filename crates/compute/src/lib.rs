//! Score aggregation and match scoring.
//!
//! - [`store::ScoreStore`] keeps one live score per (match, user) and a
//!   rolling summary per user, and derives the leaderboard and history.
//! - [`scheduler::MatchScoringScheduler`] re-scores every prediction of a
//!   match as an independent background job and lets callers drain the
//!   jobs that are in flight.

pub mod scheduler;
pub mod standings;
pub mod store;

pub use scheduler::{JobStatus, MatchScoringScheduler, RunOutcome, SchedulerMetrics, ScoringJob};
pub use standings::{HistoryItem, Standing};
pub use store::{LeaderboardEntry, ScoreRecord, ScoreStore, SharedScoreStore, UserSummary};
