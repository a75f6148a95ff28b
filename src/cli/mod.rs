//! CLI argument definitions and parsing.

pub mod types;

use clap::{builder::RangedU64ValueParser, Args, Parser, Subcommand};
use std::path::PathBuf;
use types::{LeagueConfig, Season};

/// Client and cache options shared by every command.
#[derive(Debug, Args)]
pub struct ClientArgs {
    /// Upstream base URL (or set `API_FOOTBALL_BASE_URL`).
    #[clap(long)]
    pub base_url: Option<String>,

    /// Keep statistics of finished matches on disk between runs.
    #[clap(long)]
    pub disk_cache: bool,

    /// Cache directory for `--disk-cache` (defaults to ~/.cache/league-board).
    #[clap(long)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the "last 7 matches" board for one or more leagues.
    ///
    /// Leagues are given as `39`, `39=Premier League` or
    /// `Premier League@England`. Without `--league` the default set is used.
    Board {
        /// League to include (repeatable): `-l 39 -l "Liga MX@Mexico"`.
        #[clap(long = "league", short = 'l')]
        leagues: Vec<LeagueConfig>,

        /// Match slots per team.
        #[clap(
            long,
            default_value_t = crate::config::DEFAULT_SLOTS,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..)
        )]
        slots: usize,

        /// In-flight per-fixture statistics lookups.
        #[clap(
            long,
            default_value_t = 2,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..)
        )]
        stats_concurrency: usize,

        /// Do not pull the previous season for teams short of matches.
        #[clap(long)]
        no_previous_season: bool,

        /// Output text lines instead of JSON.
        #[clap(long)]
        text: bool,

        /// Write the output to a file instead of stdout.
        #[clap(long, short)]
        out: Option<PathBuf>,

        #[clap(flatten)]
        client: ClientArgs,
    },

    /// Show the season a league resolves to.
    Season {
        /// League as `39` or `Name@Country`.
        #[clap(long, short)]
        league: LeagueConfig,

        #[clap(flatten)]
        client: ClientArgs,
    },

    /// List a league's teams.
    Roster {
        /// League as `39` or `Name@Country`.
        #[clap(long, short)]
        league: LeagueConfig,

        /// Season year; defaults to the league's resolved season.
        #[clap(long, short)]
        season: Option<Season>,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,

        #[clap(flatten)]
        client: ClientArgs,
    },
}

#[derive(Debug, Parser)]
#[clap(
    name = "league-board",
    about = "Last matches per team for football leagues",
    version
)]
pub struct LeagueBoardCli {
    /// Debug-level logging (`RUST_LOG` takes precedence).
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::LeagueRef;

    #[test]
    fn test_parse_board_leagues() {
        let cli = LeagueBoardCli::try_parse_from([
            "league-board",
            "board",
            "-l",
            "39",
            "--league",
            "Liga MX@Mexico",
            "--text",
        ])
        .unwrap();

        match cli.command {
            Commands::Board {
                leagues,
                slots,
                text,
                no_previous_season,
                ..
            } => {
                assert_eq!(leagues.len(), 2);
                assert!(matches!(leagues[0].league, LeagueRef::Id(_)));
                assert!(matches!(leagues[1].league, LeagueRef::Named { .. }));
                assert_eq!(slots, 7);
                assert!(text);
                assert!(!no_previous_season);
            }
            other => panic!("Expected Board, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_roster_with_season() {
        let cli = LeagueBoardCli::try_parse_from([
            "league-board",
            "roster",
            "--league",
            "262",
            "--season",
            "2024",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Roster { season, json, .. } => {
                assert_eq!(season, Some(Season::new(2024)));
                assert!(!json);
            }
            other => panic!("Expected Roster, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_zero_slots() {
        assert!(LeagueBoardCli::try_parse_from(["league-board", "board", "--slots", "0"]).is_err());
        assert!(
            LeagueBoardCli::try_parse_from(["league-board", "board", "--stats-concurrency", "0"])
                .is_err()
        );

        let cli = LeagueBoardCli::try_parse_from(["league-board", "board", "--slots", "5"]).unwrap();
        match cli.command {
            Commands::Board { slots, .. } => assert_eq!(slots, 5),
            other => panic!("Expected Board, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_league() {
        assert!(LeagueBoardCli::try_parse_from(["league-board", "season", "-l", "abc"]).is_err());
    }
}
