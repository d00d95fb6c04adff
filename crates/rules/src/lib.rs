//! Scoring rules and the prediction scoring engine.
//!
//! This crate provides:
//! - [`RuleSet`] point values and partial [`RuleSetOverride`]s
//! - JSON (env) and YAML (file) rule sources with fallback to defaults
//! - [`ScoringEngine`], a pure comparison of a prediction against the official lineup

pub mod engine;
pub mod loader;
pub mod rule_set;

pub use engine::{ScoreBreakdown, ScoreOutcome, ScoringEngine};
pub use loader::{load_rule_document, resolve_rule_set, RuleMetadata, ScoringRulesDocument};
pub use rule_set::{RuleSet, RuleSetOverride};
