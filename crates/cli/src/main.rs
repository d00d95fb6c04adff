mod cli;
mod fixture;
mod terminal;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use matchday_compute::{JobStatus, MatchScoringScheduler, ScoreStore};
use matchday_core::config::{load_dotenv, Config};
use matchday_rules::RuleSetOverride;
use matchday_storage::{LineupStore, PredictionStore};

use crate::cli::CliArgs;
use crate::fixture::Fixture;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let terminal = Terminal::new();

    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let fixture = Fixture::load(&args.fixture)?;
    let lineups = Arc::new(LineupStore::new());
    let predictions = Arc::new(PredictionStore::new());
    let matches = fixture.install(&lineups, &predictions);
    info!(
        lineups = matches.len(),
        predictions = predictions.all().len(),
        "fixture loaded"
    );

    let scheduler =
        MatchScoringScheduler::from_config(ScoreStore::shared(), lineups, predictions, &config);

    if let Some(ref raw) = args.rules {
        let partial = RuleSetOverride::from_json(raw).context("invalid --rules override")?;
        scheduler.configure_scoring_rules(partial);
    }

    let jobs: Vec<_> = matches
        .iter()
        .map(|match_id| scheduler.schedule_match_scoring(match_id.clone()))
        .collect();
    scheduler.wait_for_scoring().await;

    let failed: Vec<&str> = jobs
        .iter()
        .filter(|job| job.status() == JobStatus::Failed)
        .map(|job| job.match_id())
        .collect();
    for match_id in &failed {
        warn!(match_id = %match_id, "scoring failed");
    }

    let store = scheduler.store();
    if let Some(ref user_id) = args.history {
        let history = store.get_user_history(user_id);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&history)?);
        } else {
            terminal.print_history(user_id, &history)?;
        }
    } else {
        let standings = store.standings(args.limit, config.leaderboard.recent_matches);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&standings)?);
        } else {
            terminal.print_rules(&scheduler.active_rules())?;
            terminal.print_standings(&standings)?;
            terminal.print_metrics(&scheduler.metrics())?;
        }
    }

    if !failed.is_empty() {
        if !args.json {
            terminal.print_error(&format!("scoring failed for: {}", failed.join(", ")))?;
        }
        bail!("{} of {} scoring runs failed", failed.len(), jobs.len());
    }

    Ok(())
}
