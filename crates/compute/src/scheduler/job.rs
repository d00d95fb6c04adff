use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;
use uuid::Uuid;

use matchday_core::MatchId;

use super::types::JobStatus;

/// Handle to a scheduled scoring run. Dropping it does not cancel the run.
#[derive(Debug, Clone)]
pub struct ScoringJob {
    pub(crate) match_id: MatchId,
    pub(crate) status: watch::Receiver<JobStatus>,
}

impl ScoringJob {
    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn status(&self) -> JobStatus {
        *self.status.borrow()
    }

    /// Wait for the run to reach a terminal status.
    pub async fn wait(mut self) -> JobStatus {
        wait_terminal(&mut self.status).await
    }
}

/// If the job task went away without reporting (runtime shutdown), the last
/// published status is returned.
pub(crate) async fn wait_terminal(rx: &mut watch::Receiver<JobStatus>) -> JobStatus {
    let reached = rx.wait_for(|status| status.is_terminal()).await.map(|status| *status);
    match reached {
        Ok(status) => status,
        Err(_) => *rx.borrow(),
    }
}

/// Set of scoring runs that have been scheduled but not yet finished.
#[derive(Debug, Default)]
pub(crate) struct JobRegistry {
    jobs: Mutex<HashMap<Uuid, watch::Receiver<JobStatus>>>,
}

impl JobRegistry {
    pub(crate) fn register(&self, id: Uuid, status: watch::Receiver<JobStatus>) {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, status);
    }

    pub(crate) fn deregister(&self, id: Uuid) {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner).remove(&id);
    }

    /// Status receivers of every job tracked right now.
    pub(crate) fn snapshot(&self) -> Vec<watch::Receiver<JobStatus>> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
