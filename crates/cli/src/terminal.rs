use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};

use matchday_compute::{ScoreRecord, SchedulerMetrics, Standing};
use matchday_rules::RuleSet;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const HEADER: Color = Color::Magenta;
    const LEADER: Color = Color::Green;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
}

const USER_WIDTH: usize = 24;

/// Renders scoring results as colored tables on stdout.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Print the active rule set above the results.
    pub fn print_rules(&self, rules: &RuleSet) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "Rules: {} per player | {} formation | {} full lineup\n",
                rules.points_per_matched_player,
                rules.points_per_formation_match,
                rules.full_lineup_bonus,
            )),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_standings(&self, standings: &[Standing]) -> Result<()> {
        let mut stdout = io::stdout();
        if standings.is_empty() {
            execute!(
                stdout,
                SetForegroundColor(Colors::DIM),
                Print("No scores recorded yet.\n"),
                ResetColor,
            )?;
            return Ok(());
        }

        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("Leaderboard:\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "{:<5} {:<w$} {:>7} {:>8}  {}\n",
                "RANK",
                "USER",
                "POINTS",
                "MATCHES",
                "RECENT",
                w = USER_WIDTH
            )),
            Print(format!("{}\n", "-".repeat(80))),
            ResetColor,
        )?;

        for s in standings {
            let color = if s.rank == 1 { Colors::LEADER } else { Color::Reset };
            execute!(
                stdout,
                SetForegroundColor(color),
                Print(format!("{}\n", standing_row(s))),
                ResetColor,
            )?;
        }

        stdout.flush()?;
        Ok(())
    }

    pub fn print_history(&self, user_id: &str, history: &[ScoreRecord]) -> Result<()> {
        let mut stdout = io::stdout();
        if history.is_empty() {
            execute!(
                stdout,
                SetForegroundColor(Colors::DIM),
                Print(format!("No scored matches for {}.\n", user_id)),
                ResetColor,
            )?;
            return Ok(());
        }

        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print(format!("History for {}:\n", user_id)),
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "{:<16} {:>7} {:>6}  {:<25} {}\n",
                "MATCH", "POINTS", "BONUS", "CALCULATED", "MATCHED PLAYERS"
            )),
            Print(format!("{}\n", "-".repeat(80))),
            ResetColor,
        )?;

        for record in history {
            let matched: Vec<&str> = record
                .breakdown
                .matched_players
                .iter()
                .map(String::as_str)
                .collect();
            execute!(
                stdout,
                Print(format!(
                    "{:<16} {:>7} {:>6}  {:<25} {}\n",
                    record.match_id,
                    record.points,
                    record.breakdown.bonus,
                    record.calculated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    matched.join(", "),
                )),
            )?;
        }

        stdout.flush()?;
        Ok(())
    }

    /// One-line summary of the scoring runs.
    pub fn print_metrics(&self, metrics: &SchedulerMetrics) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "{} scored, {} without lineup, {} failed ({} predictions, avg {:?})\n",
                metrics.jobs_completed,
                metrics.jobs_skipped,
                metrics.jobs_failed,
                metrics.predictions_scored,
                metrics.avg_run_duration,
            )),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }
}

fn standing_row(s: &Standing) -> String {
    let recent: Vec<String> = s
        .recent_matches
        .iter()
        .map(|h| format!("{}:{}", h.match_id, h.points))
        .collect();
    format!(
        "{:<5} {:<w$} {:>7} {:>8}  {}",
        s.rank,
        truncate(&s.user_id, USER_WIDTH),
        s.total_points,
        s.match_count,
        recent.join(" "),
        w = USER_WIDTH
    )
}

/// Cut to `width` characters, marking the cut with "...".
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
