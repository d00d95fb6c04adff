use std::path::PathBuf;

use clap::Parser;

/// Score a matchday from a fixture file and print the standings.
///
/// Every match in the fixture that has an official lineup is scheduled for
/// scoring; the command waits for all runs before printing.
#[derive(Parser, Debug)]
#[command(name = "matchday", about = "Score fantasy lineup predictions and print standings")]
pub struct CliArgs {
    /// JSON file with `lineups` and `predictions` arrays
    #[arg(long, default_value = "data/fixtures/demo-matchday.json")]
    pub fixture: PathBuf,

    /// Rule override as JSON, merged over the default rule set
    /// (e.g. '{"pointsPerMatchedPlayer": 8}')
    #[arg(long)]
    pub rules: Option<String>,

    /// Maximum number of leaderboard rows
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print the match history of this user instead of the leaderboard
    #[arg(long)]
    pub history: Option<String>,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_demo_fixture() {
        let args = CliArgs::parse_from(["matchday"]);
        assert_eq!(args.fixture, PathBuf::from("data/fixtures/demo-matchday.json"));
        assert!(args.rules.is_none());
        assert!(!args.json);
    }

    #[test]
    fn parses_all_flags() {
        let args = CliArgs::parse_from([
            "matchday",
            "--fixture",
            "week1.json",
            "--rules",
            r#"{"fullLineupBonus": 0}"#,
            "--limit",
            "3",
            "--history",
            "user-1",
            "--json",
        ]);
        assert_eq!(args.fixture, PathBuf::from("week1.json"));
        assert_eq!(args.rules.as_deref(), Some(r#"{"fullLineupBonus": 0}"#));
        assert_eq!(args.limit, Some(3));
        assert_eq!(args.history.as_deref(), Some("user-1"));
        assert!(args.json);
    }
}
