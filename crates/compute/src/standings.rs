//! Ranked leaderboard rows with each user's most recent results attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use matchday_core::{MatchId, UserId};

use crate::store::{ScoreRecord, ScoreStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub match_id: MatchId,
    pub points: u32,
    pub calculated_at: DateTime<Utc>,
}

impl From<&ScoreRecord> for HistoryItem {
    fn from(record: &ScoreRecord) -> Self {
        Self {
            match_id: record.match_id.clone(),
            points: record.points,
            calculated_at: record.calculated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// 1-based position in leaderboard order.
    pub rank: usize,
    pub user_id: UserId,
    pub total_points: u64,
    pub match_count: usize,
    pub last_updated_at: DateTime<Utc>,
    pub recent_matches: Vec<HistoryItem>,
}

impl ScoreStore {
    /// Leaderboard with ranks and up to `recent` history items per user,
    /// read from a single snapshot of the store.
    pub fn standings(&self, limit: Option<usize>, recent: usize) -> Vec<Standing> {
        let state = self.read();
        state
            .leaderboard(limit)
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let recent_matches = state
                    .user_history(&entry.user_id)
                    .iter()
                    .take(recent)
                    .map(HistoryItem::from)
                    .collect();
                Standing {
                    rank: index + 1,
                    user_id: entry.user_id,
                    total_points: entry.total_points,
                    match_count: entry.match_count,
                    last_updated_at: entry.last_updated_at,
                    recent_matches,
                }
            })
            .collect()
    }
}
