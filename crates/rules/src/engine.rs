//! Prediction scoring: compares a user's squad against the official lineup.
//!
//! Scoring is a pure function of (prediction, lineup, rule set). The engine
//! holds the rule set fixed at construction, so a rule change only affects
//! engines built afterwards.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use matchday_core::{MatchdayError, OfficialLineup, PlayerId, Prediction, Result};

use crate::rule_set::RuleSet;

/// Audit trail for a single score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Players present in both the prediction and the lineup.
    pub matched_players: BTreeSet<PlayerId>,
    pub player_points: u32,
    /// Formation bonus plus full-lineup bonus.
    pub bonus: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOutcome {
    pub points: u32,
    pub breakdown: ScoreBreakdown,
    /// Rule set the score was computed with.
    pub rules: RuleSet,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    rules: RuleSet,
}

impl ScoringEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Score a prediction that may be missing either side.
    ///
    /// Returns [`MatchdayError::InvalidInput`] unless both are present.
    pub fn try_score(
        &self,
        prediction: Option<&Prediction>,
        lineup: Option<&OfficialLineup>,
    ) -> Result<ScoreOutcome> {
        match (prediction, lineup) {
            (Some(p), Some(l)) => Ok(self.score(p, l)),
            _ => Err(MatchdayError::InvalidInput(
                "prediction and official lineup are required to score".to_string(),
            )),
        }
    }

    pub fn score(&self, prediction: &Prediction, lineup: &OfficialLineup) -> ScoreOutcome {
        self.score_selection(
            &prediction.players,
            prediction.formation.as_deref(),
            &lineup.players,
            lineup.formation.as_deref(),
        )
    }

    /// Core comparison on raw player lists and formation labels.
    pub fn score_selection(
        &self,
        predicted_players: &[PlayerId],
        predicted_formation: Option<&str>,
        official_players: &[PlayerId],
        official_formation: Option<&str>,
    ) -> ScoreOutcome {
        let predicted: BTreeSet<&PlayerId> = predicted_players.iter().collect();
        let official: BTreeSet<&PlayerId> = official_players.iter().collect();

        let matched_players: BTreeSet<PlayerId> = predicted
            .intersection(&official)
            .map(|p| (*p).clone())
            .collect();
        // Large rule values saturate at u32::MAX instead of overflowing.
        let player_points = u32::try_from(matched_players.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(self.rules.points_per_matched_player);

        let mut bonus: u32 = 0;
        if formations_match(predicted_formation, official_formation) {
            bonus = bonus.saturating_add(self.rules.points_per_formation_match);
        }
        if predicted == official {
            bonus = bonus.saturating_add(self.rules.full_lineup_bonus);
        }

        ScoreOutcome {
            points: player_points.saturating_add(bonus),
            breakdown: ScoreBreakdown {
                matched_players,
                player_points,
                bonus,
            },
            rules: self.rules,
        }
    }
}

/// Exact, case-sensitive comparison; an empty label never matches.
fn formations_match(predicted: Option<&str>, official: Option<&str>) -> bool {
    match (predicted, official) {
        (Some(p), Some(o)) => !p.is_empty() && p == o,
        _ => false,
    }
}
