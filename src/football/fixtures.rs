//! Fixture aggregation: one bulk list per league, topped up where needed.
//!
//! The bulk season list is the primary source. Teams still short of matches
//! pull from the previous season's list, and teams with nothing at all fall
//! back to the per-team "last N" endpoint. A team's fixtures are always
//! newest first, finished only, and unique by fixture ID.

use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, warn};

use super::{
    resolve::{effective_id_sets, RosterTeam},
    types::{Fixture, FixtureRow, Team, Venue, FINISHED_STATUSES},
    upstream::{fetch_rows, Query, Upstream},
};
use crate::{
    cli::types::{LeagueId, Season, TeamId},
    error::{FetchError, FetchResult},
};

/// Finished fixtures of a league season, as listed in bulk.
pub async fn fetch_finished<U>(
    upstream: &U,
    league: LeagueId,
    season: Season,
) -> FetchResult<Vec<Fixture>>
where
    U: Upstream + ?Sized,
{
    let query = Query::new("/fixtures")
        .param("league", league)
        .param("season", season)
        .param("status", FINISHED_STATUSES);
    let rows: Vec<FixtureRow> = fetch_rows(upstream, &query).await?;
    Ok(rows
        .into_iter()
        .map(Fixture::from_row)
        .filter(Fixture::is_finished)
        .collect())
}

/// A team's most recent fixtures across competitions.
pub async fn fetch_team_last<U>(
    upstream: &U,
    team: TeamId,
    last: usize,
) -> FetchResult<Vec<Fixture>>
where
    U: Upstream + ?Sized,
{
    let query = Query::new("/fixtures").param("team", team).param("last", last);
    let rows: Vec<FixtureRow> = fetch_rows(upstream, &query).await?;
    Ok(rows.into_iter().map(Fixture::from_row).collect())
}

/// Newest first; ties broken by fixture ID, highest first.
pub fn sort_newest_first(fixtures: &mut [Fixture]) {
    fixtures.sort_by(|a, b| b.kickoff.cmp(&a.kickoff).then(b.id.cmp(&a.id)));
}

/// Append `extra` to `pool`, skipping fixture IDs already present.
pub fn merge(pool: &mut Vec<Fixture>, extra: Vec<Fixture>) {
    let mut seen: HashSet<_> = pool.iter().map(|f| f.id).collect();
    pool.extend(extra.into_iter().filter(|f| seen.insert(f.id)));
}

/// One fixture from the point of view of the team that played it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamFixture {
    pub fixture: Fixture,
    pub venue: Venue,
}

impl TeamFixture {
    pub fn opponent_name(&self) -> &str {
        &self.fixture.opponent(self.venue).name
    }

    pub fn is_home(&self) -> bool {
        self.venue == Venue::Home
    }
}

/// A roster team and its last finished fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMatches {
    pub team: RosterTeam,
    pub fixtures: Vec<TeamFixture>,
}

impl TeamMatches {
    pub fn is_short(&self, n: usize) -> bool {
        self.fixtures.len() < n
    }
}

/// The team's `n` most recent finished fixtures found in `pool`.
pub fn last_n_finished(
    team: &RosterTeam,
    pool: &[Fixture],
    owned: &BTreeSet<TeamId>,
    n: usize,
) -> Vec<TeamFixture> {
    let mut mine: Vec<Fixture> = pool
        .iter()
        .filter(|f| f.is_finished())
        .filter(|f| team.venue_in(f, owned).is_some())
        .cloned()
        .collect();
    sort_newest_first(&mut mine);

    let mut seen = HashSet::new();
    mine.into_iter()
        .filter(|f| seen.insert(f.id))
        .take(n)
        .filter_map(|fixture| {
            let venue = team.venue_in(&fixture, owned)?;
            Some(TeamFixture { fixture, venue })
        })
        .collect()
}

/// Split a fixture pool into per-team lists, in roster order.
pub fn partition(teams: &[Team], pool: &[Fixture], n: usize) -> Vec<TeamMatches> {
    let owned: BTreeSet<TeamId> = teams.iter().map(|t| t.id).collect();
    effective_id_sets(teams, pool)
        .into_iter()
        .map(|team| {
            let fixtures = last_n_finished(&team, pool, &owned, n);
            TeamMatches { team, fixtures }
        })
        .collect()
}

/// Result of aggregating a league's fixtures.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub teams: Vec<TeamMatches>,
    /// Set when the bulk season list could not be fetched; teams then rely
    /// on the per-team fallback alone.
    pub bulk_error: Option<FetchError>,
}

/// Gather the last `n` finished fixtures for every roster team.
pub async fn aggregate<U>(
    upstream: &U,
    league: LeagueId,
    season: Season,
    teams: &[Team],
    n: usize,
    merge_previous_season: bool,
) -> Aggregation
where
    U: Upstream + ?Sized,
{
    let (mut pool, bulk_error) = match fetch_finished(upstream, league, season).await {
        Ok(pool) => (pool, None),
        Err(e) => {
            warn!(%league, %season, error = %e, "bulk fixture list failed");
            (Vec::new(), Some(e))
        }
    };
    debug!(%league, %season, fixtures = pool.len(), "bulk fixtures");

    let mut matches = partition(teams, &pool, n);

    if merge_previous_season && matches.iter().any(|m| m.is_short(n)) {
        if let Some(previous) = season.previous() {
            match fetch_finished(upstream, league, previous).await {
                Ok(extra) => {
                    info!(%league, season = %previous, fixtures = extra.len(), "merging previous season");
                    merge(&mut pool, extra);
                    matches = partition(teams, &pool, n);
                }
                Err(e) => warn!(%league, season = %previous, error = %e, "previous season unavailable"),
            }
        }
    }

    let owned: BTreeSet<TeamId> = teams.iter().map(|t| t.id).collect();
    for entry in matches.iter_mut().filter(|m| m.fixtures.is_empty()) {
        let team_id = entry.team.team.id;
        match fetch_team_last(upstream, team_id, n).await {
            Ok(recent) => {
                entry.fixtures = last_n_finished(&entry.team, &recent, &owned, n);
                debug!(team = %entry.team.team.name, fixtures = entry.fixtures.len(), "per-team fallback");
            }
            Err(e) => warn!(team = %entry.team.team.name, error = %e, "per-team fallback failed"),
        }
    }

    Aggregation {
        teams: matches,
        bulk_error,
    }
}
