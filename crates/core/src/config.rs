use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    match profiled_env_opt(profile, key) {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(key = %key, value = %v, "invalid integer, using default {}", default);
                default
            }
        },
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub scoring: ScoringConfig,
    pub scheduler: SchedulerConfig,
    pub leaderboard: LeaderboardConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `MATCHDAY_PROFILE`. When set (e.g. `STAGING`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("MATCHDAY_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            scoring: ScoringConfig::from_env_profiled(p),
            scheduler: SchedulerConfig::from_env_profiled(p),
            leaderboard: LeaderboardConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs. Raw rule overrides are not echoed.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  scoring:     rules_override={}, rules_file={}",
            self.scoring.rules_override.is_some(),
            self.scoring
                .rules_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string()),
        );
        tracing::info!("  scheduler:   max_concurrent_jobs={}", self.scheduler.max_concurrent_jobs);
        tracing::info!("  leaderboard: recent_matches={}", self.leaderboard.recent_matches);
    }
}

// ── Scoring rules ─────────────────────────────────────────────

/// Raw sources for the process-wide rule set. Parsing happens in the rules
/// crate so that a malformed value can fall back to defaults with a log line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// JSON object from `SCORING_RULES`.
    pub rules_override: Option<String>,
    /// YAML rule document from `SCORING_RULES_FILE`.
    pub rules_file: Option<PathBuf>,
}

impl ScoringConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            rules_override: profiled_env_opt(p, "SCORING_RULES"),
            rules_file: profiled_env_opt(p, "SCORING_RULES_FILE").map(PathBuf::from),
        }
    }
}

// ── Scheduler ─────────────────────────────────────────────────

pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of scoring runs allowed to execute at once. Extra runs wait queued.
    pub max_concurrent_jobs: usize,
}

impl SchedulerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            max_concurrent_jobs: profiled_env_usize(
                p,
                "SCORING_MAX_CONCURRENT_JOBS",
                DEFAULT_MAX_CONCURRENT_JOBS,
            )
            .max(1),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
        }
    }
}

// ── Leaderboard ───────────────────────────────────────────────

pub const DEFAULT_RECENT_MATCHES: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// History items attached to each standings row.
    pub recent_matches: usize,
}

impl LeaderboardConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            recent_matches: profiled_env_usize(p, "LEADERBOARD_RECENT_MATCHES", DEFAULT_RECENT_MATCHES),
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            recent_matches: DEFAULT_RECENT_MATCHES,
        }
    }
}
