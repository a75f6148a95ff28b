//! Board command implementation

use std::{fmt::Write as _, path::PathBuf};
use tracing::info;

use super::common::{build_client, or_dash};
use crate::{
    board::{get_league_boards, LeagueBoard, MatchSlot},
    cli::{types::default_leagues, ClientArgs},
    config::BoardConfig,
    core::write_string,
    LeagueConfig, Result,
};

/// Parameters for the board command
#[derive(Debug)]
pub struct BoardParams {
    pub leagues: Vec<LeagueConfig>,
    pub slots: usize,
    pub stats_concurrency: usize,
    pub merge_previous_season: bool,
    pub as_text: bool,
    pub out: Option<PathBuf>,
    pub client: ClientArgs,
}

impl BoardParams {
    pub fn board_config(&self) -> BoardConfig {
        BoardConfig {
            slots: self.slots.max(1),
            stats_concurrency: self.stats_concurrency.max(1),
            merge_previous_season: self.merge_previous_season,
            ..BoardConfig::default()
        }
    }
}

fn slot_line(slot: &MatchSlot) -> String {
    if slot.is_blank() {
        return "    -".to_string();
    }
    let venue = match slot.is_home {
        Some(true) => "H",
        Some(false) => "A",
        None => "?",
    };
    format!(
        "    {} {} {:<24} {:>5}  goals {:>2}  corners {:>2}  cards {:>2}",
        slot.date.as_deref().unwrap_or("----------"),
        venue,
        slot.opponent,
        slot.score.as_deref().unwrap_or("-"),
        or_dash(slot.goals),
        or_dash(slot.corners),
        or_dash(slot.cards),
    )
}

/// Plain-text rendering, one line per slot.
pub fn format_boards_text(boards: &[LeagueBoard]) -> String {
    let mut out = String::new();
    for board in boards {
        let _ = writeln!(
            out,
            "{} ({})",
            board.league_name,
            or_dash(board.season)
        );
        if let Some(error) = &board.error {
            let _ = writeln!(out, "  error: {error}");
        }
        for team in &board.teams {
            let _ = writeln!(out, "  {}", team.name);
            for slot in &team.matches {
                let _ = writeln!(out, "{}", slot_line(slot));
            }
        }
    }
    out
}

/// Handle the board command
pub async fn handle_board(params: BoardParams) -> Result<()> {
    let client = build_client(&params.client)?;
    let leagues = if params.leagues.is_empty() {
        default_leagues()
    } else {
        params.leagues.clone()
    };

    let boards = get_league_boards(&client, &leagues, &params.board_config()).await;

    let failed = boards.iter().filter(|b| !b.is_ok()).count();
    info!(leagues = boards.len(), failed, "boards ready");

    let rendered = if params.as_text {
        format_boards_text(&boards)
    } else {
        serde_json::to_string_pretty(&boards)?
    };

    match &params.out {
        Some(path) => {
            write_string(path, &rendered)?;
            info!(path = %path.display(), "board written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TeamBoard;
    use crate::{FixtureId, LeagueId, Season, TeamId};

    fn board() -> LeagueBoard {
        let mut matches = vec![MatchSlot {
            fixture_id: FixtureId::new(10),
            date: Some("2025-08-16".to_string()),
            opponent: "Chelsea".to_string(),
            is_home: Some(true),
            score: Some("2-1".to_string()),
            goals: Some(3),
            corners: Some(0),
            cards: None,
        }];
        matches.resize_with(7, MatchSlot::blank);

        LeagueBoard {
            league_id: Some(LeagueId::new(39)),
            league_name: "Premier League".to_string(),
            season: Some(Season::new(2025)),
            teams: vec![TeamBoard {
                id: TeamId::new(42),
                name: "Arsenal".to_string(),
                logo: None,
                matches,
            }],
            error: None,
        }
    }

    #[test]
    fn test_format_text() {
        let text = format_boards_text(&[board()]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Premier League (2025)");
        assert_eq!(lines[1], "  Arsenal");
        assert!(lines[2].contains("2025-08-16 H Chelsea"));
        assert!(lines[2].contains("corners  0"));
        assert!(lines[2].ends_with("cards  -"));
        assert_eq!(lines.len(), 2 + 7);
        assert!(lines[3..].iter().all(|l| *l == "    -"));
    }

    #[test]
    fn test_format_text_with_error() {
        let failed = LeagueBoard {
            season: None,
            teams: Vec::new(),
            error: Some("No seasons found for league 39".to_string()),
            ..board()
        };
        let text = format_boards_text(&[failed]);
        assert_eq!(
            text,
            "Premier League (-)\n  error: No seasons found for league 39\n"
        );
    }

    #[test]
    fn test_board_config_from_params() {
        let params = BoardParams {
            leagues: Vec::new(),
            slots: 5,
            stats_concurrency: 3,
            merge_previous_season: false,
            as_text: false,
            out: None,
            client: ClientArgs {
                base_url: None,
                disk_cache: false,
                cache_dir: None,
            },
        };
        let config = params.board_config();
        assert_eq!(config.slots, 5);
        assert_eq!(config.stats_concurrency, 3);
        assert!(!config.merge_previous_season);

        let zeroed = BoardParams {
            slots: 0,
            stats_concurrency: 0,
            ..params
        };
        let config = zeroed.board_config();
        assert_eq!(config.slots, 1);
        assert_eq!(config.stats_concurrency, 1);
    }
}
