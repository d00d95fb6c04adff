//! In-memory score aggregation.
//!
//! Each (match, user) pair has at most one live [`ScoreRecord`]. A user's
//! [`UserSummary`] is updated incrementally on every write: a rescore
//! replaces the previous points for that match instead of adding to them,
//! so `total_points` always equals the sum of the summary's records and
//! `match_count` equals their number.
//!
//! All state sits behind one lock, so a `record_score` call is atomic with
//! respect to readers and to other writers.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use matchday_core::{MatchId, MatchdayError, Result, UserId};
use matchday_rules::ScoreBreakdown;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub match_id: MatchId,
    pub user_id: UserId,
    pub points: u32,
    pub breakdown: ScoreBreakdown,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: UserId,
    pub total_points: u64,
    pub match_count: usize,
    pub matches: HashMap<MatchId, ScoreRecord>,
    pub last_updated_at: DateTime<Utc>,
}

/// Leaderboard projection of a [`UserSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub total_points: u64,
    pub match_count: usize,
    pub last_updated_at: DateTime<Utc>,
}

impl From<&UserSummary> for LeaderboardEntry {
    fn from(summary: &UserSummary) -> Self {
        Self {
            user_id: summary.user_id.clone(),
            total_points: summary.total_points,
            match_count: summary.match_count,
            last_updated_at: summary.last_updated_at,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ScoreState {
    match_scores: HashMap<MatchId, HashMap<UserId, ScoreRecord>>,
    summaries: HashMap<UserId, UserSummary>,
}

impl ScoreState {
    /// Descending total points, then descending match count, then ascending user id.
    pub(crate) fn leaderboard(&self, limit: Option<usize>) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> =
            self.summaries.values().map(LeaderboardEntry::from).collect();

        entries.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then_with(|| b.match_count.cmp(&a.match_count))
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        entries
    }

    /// Most recent first; ties on timestamp ordered by match id.
    pub(crate) fn user_history(&self, user_id: &str) -> Vec<ScoreRecord> {
        let Some(summary) = self.summaries.get(user_id) else {
            return Vec::new();
        };
        let mut history: Vec<ScoreRecord> = summary.matches.values().cloned().collect();
        history.sort_by(|a, b| {
            b.calculated_at
                .cmp(&a.calculated_at)
                .then_with(|| a.match_id.cmp(&b.match_id))
        });
        history
    }
}

/// Thread-safe handle shared by the scheduler and readers.
pub type SharedScoreStore = Arc<ScoreStore>;

#[derive(Debug, Default)]
pub struct ScoreStore {
    state: RwLock<ScoreState>,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedScoreStore {
        Arc::new(Self::new())
    }

    /// Readers tolerate a poisoned lock: every write leaves the state
    /// consistent before it can panic.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ScoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Upsert the score for (match, user) and fold it into the user's summary.
    ///
    /// Replacing an existing record subtracts its points before adding the
    /// new ones and leaves `match_count` unchanged, so repeating a call with
    /// the same arguments is a no-op on the totals.
    pub fn record_score(
        &self,
        match_id: &str,
        user_id: &str,
        points: u32,
        breakdown: ScoreBreakdown,
        calculated_at: DateTime<Utc>,
    ) -> Result<()> {
        if match_id.is_empty() || user_id.is_empty() {
            return Err(MatchdayError::InvalidArgument(
                "matchId and userId are required to record a score".to_string(),
            ));
        }

        let record = ScoreRecord {
            match_id: match_id.to_string(),
            user_id: user_id.to_string(),
            points,
            breakdown,
            calculated_at,
        };

        let mut state = self
            .state
            .write()
            .map_err(|e| MatchdayError::LockPoisoned(format!("score store write lock: {}", e)))?;

        let previous = state
            .match_scores
            .entry(match_id.to_string())
            .or_default()
            .insert(user_id.to_string(), record.clone());

        let summary = state
            .summaries
            .entry(user_id.to_string())
            .or_insert_with(|| UserSummary {
                user_id: user_id.to_string(),
                total_points: 0,
                match_count: 0,
                matches: HashMap::new(),
                last_updated_at: calculated_at,
            });

        match &previous {
            Some(prior) => summary.total_points -= u64::from(prior.points),
            None => summary.match_count += 1,
        }
        summary.total_points += u64::from(points);
        summary.matches.insert(match_id.to_string(), record);
        summary.last_updated_at = summary.last_updated_at.max(calculated_at);

        debug!(
            match_id = %match_id,
            user_id = %user_id,
            points = points,
            replaced = previous.is_some(),
            total_points = summary.total_points,
            "score recorded"
        );
        Ok(())
    }

    pub fn get_leaderboard(&self, limit: Option<usize>) -> Vec<LeaderboardEntry> {
        self.read().leaderboard(limit)
    }

    /// Unknown users yield an empty history.
    pub fn get_user_history(&self, user_id: &str) -> Vec<ScoreRecord> {
        self.read().user_history(user_id)
    }

    /// All live records for a match, in no particular order.
    pub fn get_match_scores(&self, match_id: &str) -> Vec<ScoreRecord> {
        self.read()
            .match_scores
            .get(match_id)
            .map(|scores| scores.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn user_summary(&self, user_id: &str) -> Option<UserSummary> {
        self.read().summaries.get(user_id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.read().summaries.len()
    }

    /// Drop every score and summary and lift any lock poisoning. Used for
    /// test isolation.
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.match_scores.clear();
        state.summaries.clear();
        drop(state);
        self.state.clear_poison();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::BTreeSet;

    fn breakdown(points: u32) -> ScoreBreakdown {
        ScoreBreakdown {
            matched_players: BTreeSet::new(),
            player_points: points,
            bonus: 0,
        }
    }

    fn record(store: &ScoreStore, match_id: &str, user_id: &str, points: u32, at: DateTime<Utc>) {
        store
            .record_score(match_id, user_id, points, breakdown(points), at)
            .unwrap();
    }

    fn assert_summary_consistent(store: &ScoreStore, user_id: &str) {
        let summary = store.user_summary(user_id).unwrap();
        let sum: u64 = summary.matches.values().map(|r| u64::from(r.points)).sum();
        assert_eq!(summary.total_points, sum);
        assert_eq!(summary.match_count, summary.matches.len());
    }

    #[test]
    fn first_score_creates_summary() {
        let store = ScoreStore::new();
        let now = Utc::now();
        record(&store, "m1", "user-1", 30, now);

        let summary = store.user_summary("user-1").unwrap();
        assert_eq!(summary.total_points, 30);
        assert_eq!(summary.match_count, 1);
        assert_eq!(summary.last_updated_at, now);
        assert_eq!(store.get_match_scores("m1").len(), 1);
    }

    #[test]
    fn rescore_replaces_previous_points() {
        let store = ScoreStore::new();
        let now = Utc::now();
        record(&store, "m1", "user-1", 30, now);
        record(&store, "m1", "user-1", 45, now + Duration::seconds(1));

        let summary = store.user_summary("user-1").unwrap();
        assert_eq!(summary.total_points, 45);
        assert_eq!(summary.match_count, 1);
        assert_eq!(store.get_match_scores("m1")[0].points, 45);
    }

    #[test]
    fn identical_rescore_is_idempotent() {
        let store = ScoreStore::new();
        let now = Utc::now();
        record(&store, "m1", "user-1", 25, now);
        let after_first = store.user_summary("user-1").unwrap();

        record(&store, "m1", "user-1", 25, now);
        let after_second = store.user_summary("user-1").unwrap();

        assert_eq!(after_first.total_points, after_second.total_points);
        assert_eq!(after_first.match_count, after_second.match_count);
    }

    #[test]
    fn totals_track_live_records_across_many_writes() {
        let store = ScoreStore::new();
        let base = Utc::now();
        let writes = [
            ("m1", "alice", 10),
            ("m2", "alice", 20),
            ("m1", "bob", 5),
            ("m1", "alice", 0),
            ("m3", "alice", 50),
            ("m2", "alice", 15),
            ("m1", "bob", 40),
        ];
        for (i, (match_id, user_id, points)) in writes.iter().enumerate() {
            record(&store, match_id, user_id, *points, base + Duration::seconds(i as i64));
            assert_summary_consistent(&store, user_id);
        }

        let alice = store.user_summary("alice").unwrap();
        assert_eq!(alice.total_points, 65);
        assert_eq!(alice.match_count, 3);
        let bob = store.user_summary("bob").unwrap();
        assert_eq!(bob.total_points, 40);
        assert_eq!(bob.match_count, 1);
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        let store = ScoreStore::new();
        let now = Utc::now();
        assert!(matches!(
            store.record_score("", "user-1", 10, breakdown(10), now),
            Err(MatchdayError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.record_score("m1", "", 10, breakdown(10), now),
            Err(MatchdayError::InvalidArgument(_))
        ));
        assert_eq!(store.user_count(), 0);
        assert!(store.get_match_scores("m1").is_empty());
    }

    #[test]
    fn last_updated_never_moves_backwards() {
        let store = ScoreStore::new();
        let now = Utc::now();
        record(&store, "m2", "user-1", 10, now);
        record(&store, "m1", "user-1", 10, now - Duration::minutes(5));
        assert_eq!(store.user_summary("user-1").unwrap().last_updated_at, now);
    }

    #[test]
    fn leaderboard_orders_by_points_then_matches_then_user() {
        let store = ScoreStore::new();
        let now = Utc::now();
        // carol: 50 over 1 match; bob: 50 over 2 matches; alice and dave tie on 20/1.
        record(&store, "m1", "carol", 50, now);
        record(&store, "m1", "bob", 20, now);
        record(&store, "m2", "bob", 30, now);
        record(&store, "m1", "dave", 20, now);
        record(&store, "m1", "alice", 20, now);
        record(&store, "m1", "erin", 70, now);

        let order: Vec<String> = store
            .get_leaderboard(None)
            .into_iter()
            .map(|e| e.user_id)
            .collect();
        assert_eq!(order, vec!["erin", "bob", "carol", "alice", "dave"]);
    }

    #[test]
    fn leaderboard_limit_truncates_after_sorting() {
        let store = ScoreStore::new();
        let now = Utc::now();
        record(&store, "m1", "low", 5, now);
        record(&store, "m1", "high", 50, now);
        record(&store, "m1", "mid", 25, now);

        let top = store.get_leaderboard(Some(2));
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user_id, "high");
        assert_eq!(top[1].user_id, "mid");
        assert!(store.get_leaderboard(Some(0)).is_empty());
        assert_eq!(store.get_leaderboard(Some(10)).len(), 3);
    }

    #[test]
    fn history_is_most_recent_first() {
        let store = ScoreStore::new();
        let base = Utc::now();
        record(&store, "m1", "user-1", 10, base);
        record(&store, "m2", "user-1", 20, base + Duration::hours(2));
        record(&store, "m3", "user-1", 30, base + Duration::hours(1));

        let matches: Vec<String> = store
            .get_user_history("user-1")
            .into_iter()
            .map(|r| r.match_id)
            .collect();
        assert_eq!(matches, vec!["m2", "m3", "m1"]);
    }

    #[test]
    fn unknown_user_has_empty_history() {
        let store = ScoreStore::new();
        assert!(store.get_user_history("nobody").is_empty());
        assert!(store.get_match_scores("nothing").is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let store = ScoreStore::new();
        record(&store, "m1", "user-1", 10, Utc::now());
        store.clear();
        assert!(store.get_leaderboard(None).is_empty());
        assert!(store.get_match_scores("m1").is_empty());
        assert!(store.user_summary("user-1").is_none());
    }

    #[test]
    fn concurrent_rescores_keep_summary_consistent() {
        let store = Arc::new(ScoreStore::new());
        let now = Utc::now();

        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..200u32 {
                        let match_id = format!("m{}", i % 4);
                        store
                            .record_score(&match_id, "user-1", t * 10 + i % 7, breakdown(0), now)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_summary_consistent(&store, "user-1");
        let summary = store.user_summary("user-1").unwrap();
        assert_eq!(summary.match_count, 4);
        for record in store.get_match_scores("m0") {
            assert_eq!(summary.matches["m0"], record);
        }
    }

    #[test]
    fn clear_recovers_from_poisoned_lock() {
        let store = Arc::new(ScoreStore::new());
        record(&store, "m1", "user-1", 10, Utc::now());

        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.state.write().unwrap();
            panic!("writer died mid-update");
        })
        .join();

        let err = store
            .record_score("m1", "user-2", 5, breakdown(5), Utc::now())
            .unwrap_err();
        assert!(matches!(err, MatchdayError::LockPoisoned(_)));

        store.clear();
        assert_eq!(store.user_count(), 0);
        record(&store, "m1", "user-2", 5, Utc::now());
        assert_eq!(store.user_summary("user-2").unwrap().total_points, 5);
    }
}
