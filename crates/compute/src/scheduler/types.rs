use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of one scheduled scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    /// Registered and waiting for a worker permit.
    Queued,
    Running,
    /// Finished without error, including the "no lineup yet" case.
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Result of a successful scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// No official lineup exists for the match; nothing was written.
    NoLineup,
    /// Every prediction was scored and recorded with one shared timestamp.
    Scored {
        scored: usize,
        calculated_at: DateTime<Utc>,
    },
}
