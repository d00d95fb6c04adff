//! Point values used by the scoring engine.

use serde::{Deserialize, Serialize};

use matchday_core::{MatchdayError, Result};

pub const DEFAULT_POINTS_PER_MATCHED_PLAYER: u32 = 10;
pub const DEFAULT_POINTS_PER_FORMATION_MATCH: u32 = 5;
pub const DEFAULT_FULL_LINEUP_BONUS: u32 = 15;

/// Complete, immutable set of point values for one scoring invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    pub points_per_matched_player: u32,
    pub points_per_formation_match: u32,
    pub full_lineup_bonus: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            points_per_matched_player: DEFAULT_POINTS_PER_MATCHED_PLAYER,
            points_per_formation_match: DEFAULT_POINTS_PER_FORMATION_MATCH,
            full_lineup_bonus: DEFAULT_FULL_LINEUP_BONUS,
        }
    }
}

impl RuleSet {
    /// Apply the fields present in `partial` on top of `self`.
    pub fn with_override(&self, partial: &RuleSetOverride) -> RuleSet {
        RuleSet {
            points_per_matched_player: partial
                .points_per_matched_player
                .unwrap_or(self.points_per_matched_player),
            points_per_formation_match: partial
                .points_per_formation_match
                .unwrap_or(self.points_per_formation_match),
            full_lineup_bonus: partial.full_lineup_bonus.unwrap_or(self.full_lineup_bonus),
        }
    }
}

/// Partial rule set. Missing fields keep the value they are merged over.
///
/// Accepts both the current field names and the older
/// `playerMatchPoints` / `formationMatchPoints` spellings. Values must be
/// non-negative integers and unknown keys are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleSetOverride {
    #[serde(default, alias = "playerMatchPoints", skip_serializing_if = "Option::is_none")]
    pub points_per_matched_player: Option<u32>,
    #[serde(default, alias = "formationMatchPoints", skip_serializing_if = "Option::is_none")]
    pub points_per_formation_match: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_lineup_bonus: Option<u32>,
}

impl RuleSetOverride {
    /// Parse a JSON object such as `{"fullLineupBonus": 25}`.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| MatchdayError::RuleConfig(format!("invalid rule override: {}", e)))
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: RuleSetOverride) -> RuleSetOverride {
        RuleSetOverride {
            points_per_matched_player: other
                .points_per_matched_player
                .or(self.points_per_matched_player),
            points_per_formation_match: other
                .points_per_formation_match
                .or(self.points_per_formation_match),
            full_lineup_bonus: other.full_lineup_bonus.or(self.full_lineup_bonus),
        }
    }

    /// Resolve against the default rule set.
    pub fn over_defaults(&self) -> RuleSet {
        RuleSet::default().with_override(self)
    }

    pub fn is_empty(&self) -> bool {
        self.points_per_matched_player.is_none()
            && self.points_per_formation_match.is_none()
            && self.full_lineup_bonus.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let rules = RuleSet::default();
        assert_eq!(rules.points_per_matched_player, 10);
        assert_eq!(rules.points_per_formation_match, 5);
        assert_eq!(rules.full_lineup_bonus, 15);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let partial = RuleSetOverride::from_json(r#"{"fullLineupBonus": 25}"#).unwrap();
        let rules = partial.over_defaults();
        assert_eq!(rules.full_lineup_bonus, 25);
        assert_eq!(rules.points_per_matched_player, 10);
        assert_eq!(rules.points_per_formation_match, 5);
    }

    #[test]
    fn accepts_legacy_field_names() {
        let partial =
            RuleSetOverride::from_json(r#"{"playerMatchPoints": 3, "formationMatchPoints": 7}"#)
                .unwrap();
        assert_eq!(partial.points_per_matched_player, Some(3));
        assert_eq!(partial.points_per_formation_match, Some(7));
    }

    #[test]
    fn rejects_negative_values() {
        let err = RuleSetOverride::from_json(r#"{"fullLineupBonus": -1}"#).unwrap_err();
        assert!(matches!(err, MatchdayError::RuleConfig(_)));
    }

    #[test]
    fn rejects_fractional_values() {
        assert!(RuleSetOverride::from_json(r#"{"pointsPerMatchedPlayer": 2.5}"#).is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(RuleSetOverride::from_json(r#"{"pointsPerGoal": 4}"#).is_err());
    }

    #[test]
    fn rejects_non_object_input() {
        assert!(RuleSetOverride::from_json("not json").is_err());
        assert!(RuleSetOverride::from_json("42").is_err());
    }

    #[test]
    fn merge_prefers_later_layer() {
        let base = RuleSetOverride {
            points_per_matched_player: Some(1),
            full_lineup_bonus: Some(2),
            ..Default::default()
        };
        let top = RuleSetOverride {
            full_lineup_bonus: Some(9),
            ..Default::default()
        };
        let merged = base.merge(top);
        assert_eq!(merged.points_per_matched_player, Some(1));
        assert_eq!(merged.full_lineup_bonus, Some(9));
        assert_eq!(merged.points_per_formation_match, None);
    }

    #[test]
    fn empty_object_is_empty_override() {
        let partial = RuleSetOverride::from_json("{}").unwrap();
        assert!(partial.is_empty());
        assert_eq!(partial.over_defaults(), RuleSet::default());
    }
}
