use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::info;

use matchday_core::{MatchId, OfficialLineup, Result};

use crate::source::LineupSource;

/// One official lineup per match. Resubmission replaces the previous one
/// wholesale; superseded lineups are not kept.
#[derive(Debug, Default)]
pub struct LineupStore {
    lineups: RwLock<HashMap<MatchId, OfficialLineup>>,
}

impl LineupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `lineup`, returning the lineup it replaced, if any.
    pub fn save(&self, lineup: OfficialLineup) -> Option<OfficialLineup> {
        let mut lineups = self.lineups.write().unwrap_or_else(PoisonError::into_inner);
        info!(
            match_id = %lineup.match_id,
            submitted_by = %lineup.submitted_by,
            players = lineup.players.len(),
            "official lineup saved"
        );
        lineups.insert(lineup.match_id.clone(), lineup)
    }

    pub fn get(&self, match_id: &str) -> Option<OfficialLineup> {
        self.lineups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(match_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lineups.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lineups.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[async_trait]
impl LineupSource for LineupStore {
    async fn official_lineup(&self, match_id: &str) -> Result<Option<OfficialLineup>> {
        Ok(self.get(match_id))
    }
}
