//! Matchday input file: official lineups plus user predictions.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use matchday_core::{MatchId, OfficialLineup, Prediction};
use matchday_storage::{LineupStore, PredictionStore, SaveOutcome};

#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub lineups: Vec<OfficialLineup>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid fixture {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Save everything into the stores and return the matches that now have
    /// an official lineup, in id order.
    pub fn install(&self, lineups: &LineupStore, predictions: &PredictionStore) -> Vec<MatchId> {
        for prediction in &self.predictions {
            if prediction.user_id.is_empty() || prediction.match_id.is_empty() {
                warn!(prediction_id = %prediction.id, "skipping prediction without user or match");
                continue;
            }
            let (_, outcome) = predictions.save(prediction.clone());
            if outcome == SaveOutcome::Updated {
                debug!(
                    user_id = %prediction.user_id,
                    match_id = %prediction.match_id,
                    "later prediction replaced an earlier one"
                );
            }
        }

        let mut matches = BTreeSet::new();
        for lineup in &self.lineups {
            if lineups.save(lineup.clone()).is_some() {
                debug!(match_id = %lineup.match_id, "lineup replaced");
            }
            matches.insert(lineup.match_id.clone());
        }
        matches.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "lineups": [
            {"matchId": "m2", "players": ["p1"], "submittedBy": "admin"},
            {"matchId": "m1", "players": ["p1", "p2"], "formation": "4-4-2", "submittedBy": "admin"}
        ],
        "predictions": [
            {"userId": "user-1", "matchId": "m1", "players": ["p1", "p2"], "formation": "4-4-2"},
            {"userId": "user-1", "matchId": "m1", "players": ["p1"]},
            {"userId": "", "matchId": "m1", "players": ["p1"]}
        ]
    }"#;

    #[test]
    fn parses_camel_case_with_defaults() {
        let fixture = Fixture::from_json(SAMPLE).unwrap();
        assert_eq!(fixture.lineups.len(), 2);
        assert_eq!(fixture.lineups[0].formation, None);
        assert_eq!(fixture.predictions.len(), 3);
        assert_eq!(fixture.predictions[0].formation.as_deref(), Some("4-4-2"));
    }

    #[test]
    fn empty_object_is_an_empty_fixture() {
        let fixture = Fixture::from_json("{}").unwrap();
        assert!(fixture.lineups.is_empty());
        assert!(fixture.predictions.is_empty());
    }

    #[test]
    fn install_upserts_and_lists_scored_matches() {
        let fixture = Fixture::from_json(SAMPLE).unwrap();
        let lineups = LineupStore::new();
        let predictions = PredictionStore::new();

        let matches = fixture.install(&lineups, &predictions);
        assert_eq!(matches, vec!["m1".to_string(), "m2".to_string()]);
        assert_eq!(lineups.len(), 2);

        let stored = predictions.for_match("m1");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].players, vec!["p1".to_string()]);
    }

    #[test]
    fn load_reports_the_path_on_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = Fixture::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid fixture"));
    }

    #[test]
    fn demo_fixture_parses() {
        let raw = include_str!("../../../data/fixtures/demo-matchday.json");
        let fixture = Fixture::from_json(raw).unwrap();
        assert_eq!(fixture.lineups.len(), 2);
        assert_eq!(fixture.predictions.len(), 6);
    }
}
