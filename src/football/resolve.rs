//! League, season and roster resolution.
//!
//! The upstream sometimes files a team's fixtures under an ID other than
//! its roster ID. Each roster team therefore owns a set of effective IDs:
//! its roster ID plus any fixture-side ID whose name matches it and that no
//! other roster team already owns.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use super::{
    names::names_match,
    types::{Fixture, LeagueRow, SeasonInfo, Side, Team, TeamRow, Venue},
    upstream::{fetch_rows, Query, Upstream},
};
use crate::{
    cli::types::{LeagueId, LeagueRef, Season, TeamId},
    error::{BoardError, FetchError, Result},
};

/// A league pinned to the season the board is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLeague {
    pub id: LeagueId,
    pub name: String,
    pub season: Season,
}

/// The current season if flagged, else the most recent one listed.
pub fn pick_season(seasons: &[SeasonInfo]) -> Option<Season> {
    seasons
        .iter()
        .filter(|s| s.current)
        .map(|s| s.year)
        .max()
        .or_else(|| seasons.iter().map(|s| s.year).max())
}

fn league_query(league: &LeagueRef) -> Query {
    match league {
        LeagueRef::Id(id) => Query::new("/leagues").param("id", id),
        LeagueRef::Named { name, country } => Query::new("/leagues")
            .param("name", name)
            .param("country", country),
    }
}

/// Look up a league and choose its season.
pub async fn resolve_season<U>(upstream: &U, league: &LeagueRef) -> Result<ResolvedLeague>
where
    U: Upstream + ?Sized,
{
    let rows: Vec<LeagueRow> = fetch_rows(upstream, &league_query(league)).await?;

    let row = match league {
        LeagueRef::Id(id) => rows.into_iter().find(|r| r.league.id == *id),
        LeagueRef::Named { name, .. } => {
            let wanted = name.to_lowercase();
            let mut rows = rows;
            match rows
                .iter()
                .position(|r| r.league.name.to_lowercase() == wanted)
            {
                Some(idx) => Some(rows.swap_remove(idx)),
                None => rows.into_iter().next(),
            }
        }
    };

    let row = match (row, league) {
        (Some(row), _) => row,
        (None, LeagueRef::Id(_)) => {
            return Err(BoardError::NoSeasons {
                league: league.to_string(),
            })
        }
        (None, LeagueRef::Named { .. }) => {
            return Err(BoardError::UnknownLeague {
                query: league.to_string(),
            })
        }
    };

    let season = pick_season(&row.seasons).ok_or_else(|| BoardError::NoSeasons {
        league: league.to_string(),
    })?;
    info!(league = %row.league.id, name = %row.league.name, %season, "resolved season");

    Ok(ResolvedLeague {
        id: row.league.id,
        name: row.league.name,
        season,
    })
}

/// Teams of a league for the season the roster was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub season: Season,
    pub teams: Vec<Team>,
}

async fn fetch_teams<U>(
    upstream: &U,
    league: LeagueId,
    season: Season,
) -> std::result::Result<Vec<Team>, FetchError>
where
    U: Upstream + ?Sized,
{
    let query = Query::new("/teams")
        .param("league", league)
        .param("season", season);
    let rows: Vec<TeamRow> = fetch_rows(upstream, &query).await?;

    let mut seen = BTreeSet::new();
    Ok(rows
        .into_iter()
        .map(|r| r.team)
        .filter(|t| seen.insert(t.id))
        .collect())
}

/// Fetch the league's teams, falling back to the previous season when the
/// current one has no roster published yet.
pub async fn resolve_roster<U>(upstream: &U, league: LeagueId, season: Season) -> Result<Roster>
where
    U: Upstream + ?Sized,
{
    let teams = fetch_teams(upstream, league, season).await?;
    if !teams.is_empty() {
        debug!(%league, %season, teams = teams.len(), "roster loaded");
        return Ok(Roster { season, teams });
    }

    let empty = || BoardError::EmptyRoster {
        league: league.to_string(),
        season: season.as_u16(),
    };
    let previous = season.previous().ok_or_else(empty)?;
    warn!(%league, %season, %previous, "empty roster, trying previous season");

    let teams = fetch_teams(upstream, league, previous).await?;
    if teams.is_empty() {
        return Err(empty());
    }
    Ok(Roster {
        season: previous,
        teams,
    })
}

/// A roster team with every ID its fixtures may be filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterTeam {
    pub team: Team,
    pub ids: BTreeSet<TeamId>,
}

impl RosterTeam {
    pub fn new(team: Team) -> Self {
        let ids = BTreeSet::from([team.id]);
        Self { team, ids }
    }

    fn claims(&self, side: &Side, owned: &BTreeSet<TeamId>) -> bool {
        if self.ids.contains(&side.id) {
            return true;
        }
        !owned.contains(&side.id) && names_match(&self.team.name, &side.name)
    }

    /// Which side of `fixture` this team played, if any.
    ///
    /// `owned` holds every roster ID of the league; a side carrying another
    /// roster team's ID is never claimed by name.
    pub fn venue_in(&self, fixture: &Fixture, owned: &BTreeSet<TeamId>) -> Option<Venue> {
        if self.ids.contains(&fixture.home.id) {
            return Some(Venue::Home);
        }
        if self.ids.contains(&fixture.away.id) {
            return Some(Venue::Away);
        }
        if self.claims(&fixture.home, owned) {
            Some(Venue::Home)
        } else if self.claims(&fixture.away, owned) {
            Some(Venue::Away)
        } else {
            None
        }
    }
}

/// Fixture-side name → IDs seen under that name.
#[derive(Debug, Default, Clone)]
pub struct AliasIndex {
    by_name: BTreeMap<String, BTreeSet<TeamId>>,
}

impl AliasIndex {
    pub fn from_fixtures<'a>(fixtures: impl IntoIterator<Item = &'a Fixture>) -> Self {
        let mut index = Self::default();
        for fixture in fixtures {
            for side in [&fixture.home, &fixture.away] {
                index
                    .by_name
                    .entry(side.name.clone())
                    .or_default()
                    .insert(side.id);
            }
        }
        index
    }

    /// IDs filed under names matching `name`.
    pub fn ids_matching(&self, name: &str) -> BTreeSet<TeamId> {
        self.by_name
            .iter()
            .filter(|(alias, _)| names_match(name, alias))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect()
    }
}

/// Build each roster team's effective ID set from the fixtures at hand.
pub fn effective_id_sets(teams: &[Team], fixtures: &[Fixture]) -> Vec<RosterTeam> {
    let owned: BTreeSet<TeamId> = teams.iter().map(|t| t.id).collect();
    let index = AliasIndex::from_fixtures(fixtures);

    teams
        .iter()
        .cloned()
        .map(|team| {
            let mut roster_team = RosterTeam::new(team);
            let aliases: Vec<TeamId> = index
                .ids_matching(&roster_team.team.name)
                .into_iter()
                .filter(|id| !owned.contains(id))
                .collect();
            if !aliases.is_empty() {
                debug!(team = %roster_team.team.name, ?aliases, "aliased fixture IDs");
            }
            roster_team.ids.extend(aliases);
            roster_team
        })
        .collect()
}
