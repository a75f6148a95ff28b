//! League boards: the fixed-shape output of the pipeline.
//!
//! Every team gets exactly `slots` match slots, newest first, padded with
//! blank slots. Failures are kept per league, in the board's `error` field,
//! so one bad league never takes the others down.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

use crate::{
    cli::types::{FixtureId, LeagueConfig, LeagueId, Season, TeamId},
    config::BoardConfig,
    error::Result,
    football::{
        aggregate, resolve_roster, resolve_season, FixtureStats, StatFetcher, TeamFixture,
        TeamMatches, Upstream,
    },
};

#[cfg(test)]
mod tests;

/// Opponent shown on padding slots.
pub const BLANK_OPPONENT: &str = "-";

/// One match as shown on the board. A blank slot has fixture ID 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSlot {
    pub fixture_id: FixtureId,
    pub date: Option<String>,
    pub opponent: String,
    pub is_home: Option<bool>,
    /// Final score, home side first.
    pub score: Option<String>,
    pub goals: Option<u32>,
    pub corners: Option<u32>,
    pub cards: Option<u32>,
}

impl MatchSlot {
    pub fn blank() -> Self {
        Self {
            fixture_id: FixtureId::BLANK,
            date: None,
            opponent: BLANK_OPPONENT.to_string(),
            is_home: None,
            score: None,
            goals: None,
            corners: None,
            cards: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.fixture_id.is_blank()
    }

    pub fn from_fixture(entry: &TeamFixture, stats: Option<&FixtureStats>) -> Self {
        let fixture = &entry.fixture;
        let stats = stats.copied().unwrap_or_default();
        Self {
            fixture_id: fixture.id,
            date: Some(fixture.date.clone()).filter(|d| !d.is_empty()),
            opponent: entry.opponent_name().to_string(),
            is_home: Some(entry.is_home()),
            score: Some(fixture.score()),
            goals: Some(fixture.total_goals()),
            corners: stats.corners,
            cards: stats.cards,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamBoard {
    pub id: TeamId,
    pub name: String,
    pub logo: Option<String>,
    pub matches: Vec<MatchSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueBoard {
    pub league_id: Option<LeagueId>,
    pub league_name: String,
    pub season: Option<Season>,
    pub teams: Vec<TeamBoard>,
    pub error: Option<String>,
}

impl LeagueBoard {
    fn pending(config: &LeagueConfig) -> Self {
        Self {
            league_id: config.league_id(),
            league_name: config.label(),
            season: None,
            teams: Vec::new(),
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Every fixture ID shown for any team, each once.
pub fn displayed_fixture_ids(teams: &[TeamMatches]) -> BTreeSet<FixtureId> {
    teams
        .iter()
        .flat_map(|t| t.fixtures.iter().map(|f| f.fixture.id))
        .collect()
}

/// Map fixtures to slots, pad to `slots`, and order teams by name.
pub fn assemble_teams(
    teams: &[TeamMatches],
    stats: &BTreeMap<FixtureId, FixtureStats>,
    slots: usize,
) -> Vec<TeamBoard> {
    let mut boards: Vec<TeamBoard> = teams
        .iter()
        .map(|entry| {
            let mut matches: Vec<MatchSlot> = entry
                .fixtures
                .iter()
                .take(slots)
                .map(|f| MatchSlot::from_fixture(f, stats.get(&f.fixture.id)))
                .collect();
            matches.resize_with(slots, MatchSlot::blank);

            let team = &entry.team.team;
            TeamBoard {
                id: team.id,
                name: team.name.clone(),
                logo: team.logo.clone(),
                matches,
            }
        })
        .collect();

    boards.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.id.cmp(&b.id))
    });
    boards
}

async fn try_build<U>(
    upstream: &U,
    config: &LeagueConfig,
    board: &BoardConfig,
    partial: &mut LeagueBoard,
) -> Result<()>
where
    U: Upstream + ?Sized,
{
    let resolved = resolve_season(upstream, &config.league).await?;
    partial.league_id = Some(resolved.id);
    if config.display_name.is_none() {
        partial.league_name = resolved.name.clone();
    }
    partial.season = Some(resolved.season);

    let roster = resolve_roster(upstream, resolved.id, resolved.season).await?;
    partial.season = Some(roster.season);

    let aggregation = aggregate(
        upstream,
        resolved.id,
        roster.season,
        &roster.teams,
        board.slots,
        board.merge_previous_season,
    )
    .await;
    if let Some(e) = &aggregation.bulk_error {
        partial.error = Some(e.to_string());
    }

    let ids = displayed_fixture_ids(&aggregation.teams);
    let stats = StatFetcher::new(upstream, board).stats_for(&ids).await;

    partial.teams = assemble_teams(&aggregation.teams, &stats, board.slots);
    Ok(())
}

/// Build one league's board. Never fails; errors end up in `error`.
pub async fn build_league_board<U>(
    upstream: &U,
    config: &LeagueConfig,
    board: &BoardConfig,
) -> LeagueBoard
where
    U: Upstream + ?Sized,
{
    let mut partial = LeagueBoard::pending(config);

    match try_build(upstream, config, board, &mut partial).await {
        Ok(()) => info!(league = %partial.league_name, teams = partial.teams.len(), "board built"),
        Err(e) => {
            warn!(league = %partial.league_name, error = %e, "board failed");
            partial.teams.clear();
            partial.error = Some(e.to_string());
        }
    }
    partial
}

/// Build boards for every configured league, in configuration order.
///
/// Leagues run one after another: they all share the same API key and its
/// rate limit.
pub async fn get_league_boards<U>(
    upstream: &U,
    leagues: &[LeagueConfig],
    board: &BoardConfig,
) -> Vec<LeagueBoard>
where
    U: Upstream + ?Sized,
{
    let mut boards = Vec::with_capacity(leagues.len());
    for league in leagues {
        boards.push(build_league_board(upstream, league, board).await);
    }
    boards
}
