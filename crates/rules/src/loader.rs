//! Rule set sources: a YAML rule document on disk and a JSON env override.
//!
//! [`resolve_rule_set`] layers defaults, then the file, then the env value.
//! A source that fails to load or parse is logged and skipped; it never
//! aborts startup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use matchday_core::config::ScoringConfig;
use matchday_core::{MatchdayError, Result};

use crate::rule_set::{RuleSet, RuleSetOverride};

pub const SCORING_RULES_KIND: &str = "ScoringRules";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Top-level YAML document carrying a partial rule set.
///
/// ```yaml
/// apiVersion: v1
/// kind: ScoringRules
/// metadata:
///   id: cup-final
///   name: Cup final rules
/// spec:
///   fullLineupBonus: 30
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringRulesDocument {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: RuleMetadata,
    pub spec: RuleSetOverride,
}

impl ScoringRulesDocument {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let doc: ScoringRulesDocument = serde_yaml::from_str(yaml)
            .map_err(|e| MatchdayError::RuleConfig(format!("invalid rule document: {}", e)))?;
        if doc.kind != SCORING_RULES_KIND {
            return Err(MatchdayError::RuleConfig(format!(
                "expected kind {}, got {}",
                SCORING_RULES_KIND, doc.kind
            )));
        }
        Ok(doc)
    }
}

pub fn load_rule_document(path: &Path) -> Result<ScoringRulesDocument> {
    let yaml = fs::read_to_string(path)?;
    ScoringRulesDocument::from_yaml(&yaml)
}

/// Build the startup rule set from configuration.
pub fn resolve_rule_set(config: &ScoringConfig) -> RuleSet {
    let mut layered = RuleSetOverride::default();

    if let Some(path) = &config.rules_file {
        match load_rule_document(path) {
            Ok(doc) => {
                info!(path = %path.display(), rule_id = %doc.metadata.id, "loaded scoring rule document");
                layered = layered.merge(doc.spec);
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load scoring rules file, ignoring it");
            }
        }
    }

    if let Some(raw) = &config.rules_override {
        match RuleSetOverride::from_json(raw) {
            Ok(partial) => layered = layered.merge(partial),
            Err(e) => {
                error!(error = %e, "failed to parse SCORING_RULES configuration, ignoring it");
            }
        }
    }

    let rules = layered.over_defaults();
    info!(
        points_per_matched_player = rules.points_per_matched_player,
        points_per_formation_match = rules.points_per_formation_match,
        full_lineup_bonus = rules.full_lineup_bonus,
        "active scoring rules"
    );
    rules
}
