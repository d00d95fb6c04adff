use async_trait::async_trait;

use matchday_core::{OfficialLineup, Prediction, Result};

/// Lookup of the official lineup for a match.
#[async_trait]
pub trait LineupSource: Send + Sync {
    /// `Ok(None)` means no lineup has been submitted yet.
    async fn official_lineup(&self, match_id: &str) -> Result<Option<OfficialLineup>>;
}

/// Lookup of every live prediction for a match.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    async fn predictions_for_match(&self, match_id: &str) -> Result<Vec<Prediction>>;
}
