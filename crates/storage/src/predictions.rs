use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use matchday_core::{MatchId, Prediction, Result, UserId};

use crate::source::PredictionSource;

/// Whether a save created a new prediction or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// Live predictions keyed by (user, match).
#[derive(Debug, Default)]
pub struct PredictionStore {
    predictions: RwLock<HashMap<(UserId, MatchId), Prediction>>,
}

impl PredictionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a prediction.
    ///
    /// A resubmission for the same (user, match) keeps the original `id` and
    /// `created_at` and stamps `updated_at` with the current time.
    pub fn save(&self, mut prediction: Prediction) -> (Prediction, SaveOutcome) {
        let key = (prediction.user_id.clone(), prediction.match_id.clone());
        let mut predictions = self.predictions.write().unwrap_or_else(PoisonError::into_inner);

        let outcome = match predictions.get(&key) {
            Some(existing) => {
                prediction.id = existing.id;
                prediction.created_at = existing.created_at;
                prediction.updated_at = Utc::now();
                SaveOutcome::Updated
            }
            None => SaveOutcome::Created,
        };

        debug!(
            user_id = %prediction.user_id,
            match_id = %prediction.match_id,
            outcome = ?outcome,
            "prediction saved"
        );
        predictions.insert(key, prediction.clone());
        (prediction, outcome)
    }

    pub fn get(&self, user_id: &str, match_id: &str) -> Option<Prediction> {
        self.predictions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(user_id.to_string(), match_id.to_string()))
            .cloned()
    }

    /// Predictions for one match, ordered by user id.
    pub fn for_match(&self, match_id: &str) -> Vec<Prediction> {
        let predictions = self.predictions.read().unwrap_or_else(PoisonError::into_inner);
        let mut found: Vec<Prediction> = predictions
            .values()
            .filter(|p| p.match_id == match_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        found
    }

    pub fn all(&self) -> Vec<Prediction> {
        self.predictions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.predictions.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[async_trait]
impl PredictionSource for PredictionStore {
    async fn predictions_for_match(&self, match_id: &str) -> Result<Vec<Prediction>> {
        Ok(self.for_match(match_id))
    }
}
