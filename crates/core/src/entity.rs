use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type MatchId = String;
pub type UserId = String;
pub type PlayerId = String;

/// A user's guessed squad for one match.
///
/// There is one live prediction per (user, match). Resubmitting replaces
/// the players and formation but keeps `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub user_id: UserId,
    pub match_id: MatchId,
    /// May contain duplicates; scoring deduplicates before comparing.
    pub players: Vec<PlayerId>,
    #[serde(default)]
    pub formation: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Prediction {
    pub fn new(
        user_id: impl Into<UserId>,
        match_id: impl Into<MatchId>,
        players: Vec<PlayerId>,
        formation: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            match_id: match_id.into(),
            players,
            formation,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The administrator-confirmed lineup used as scoring ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficialLineup {
    pub match_id: MatchId,
    pub players: Vec<PlayerId>,
    #[serde(default)]
    pub formation: Option<String>,
    pub submitted_by: UserId,
    #[serde(default = "Utc::now")]
    pub submitted_at: DateTime<Utc>,
}

impl OfficialLineup {
    pub fn new(
        match_id: impl Into<MatchId>,
        players: Vec<PlayerId>,
        formation: Option<String>,
        submitted_by: impl Into<UserId>,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            players,
            formation,
            submitted_by: submitted_by.into(),
            submitted_at: Utc::now(),
        }
    }
}

/// Convenience for building player lists from string literals.
pub fn player_ids<I, S>(ids: I) -> Vec<PlayerId>
where
    I: IntoIterator<Item = S>,
    S: Into<PlayerId>,
{
    ids.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_deserializes_with_defaults() {
        let json = r#"{"userId":"user-1","matchId":"m1","players":["p1","p2"]}"#;
        let prediction: Prediction = serde_json::from_str(json).unwrap();
        assert_eq!(prediction.user_id, "user-1");
        assert_eq!(prediction.players, vec!["p1", "p2"]);
        assert!(prediction.formation.is_none());
        assert!(!prediction.id.is_nil());
    }

    #[test]
    fn lineup_round_trips_camel_case_fields() {
        let lineup = OfficialLineup::new("m1", player_ids(["p1", "p2"]), Some("4-3-3".into()), "admin");
        let json = serde_json::to_value(&lineup).unwrap();
        assert_eq!(json["matchId"], "m1");
        assert_eq!(json["submittedBy"], "admin");
        assert_eq!(json["formation"], "4-3-3");
    }
}
