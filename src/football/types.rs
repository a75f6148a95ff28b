use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::types::{FixtureId, LeagueId, Season, TeamId};


/// Status filter for finished matches: full time, after extra time, penalties.
pub const FINISHED_STATUSES: &str = "FT-AET-PEN";

/// Row of `/leagues`
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueRow {
    pub league: LeagueInfo,
    #[serde(default)]
    pub seasons: Vec<SeasonInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueInfo {
    pub id: LeagueId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SeasonInfo {
    pub year: Season,
    #[serde(default)]
    pub current: bool,
}

/// Row of `/teams`
#[derive(Debug, Clone, Deserialize)]
pub struct TeamRow {
    pub team: Team,
}

/// A roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Row of `/fixtures`
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureRow {
    pub fixture: FixtureInfo,
    pub teams: FixtureTeams,
    #[serde(default)]
    pub goals: Goals,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureInfo {
    pub id: FixtureId,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub status: StatusInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusInfo {
    pub short: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureTeams {
    pub home: Side,
    pub away: Side,
}

/// One participant as named inside a fixture payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Side {
    pub id: TeamId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Goals {
    #[serde(default)]
    pub home: Option<u32>,
    #[serde(default)]
    pub away: Option<u32>,
}

/// Row of `/fixtures/statistics`: one per participant.
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsRow {
    #[serde(default)]
    pub statistics: Vec<StatItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Value,
}

/// Row of `/fixtures/events`
#[derive(Debug, Clone, Deserialize)]
pub struct EventRow {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Match state, from the upstream's short status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureStatus {
    FullTime,
    ExtraTime,
    Penalties,
    Other(String),
}

impl FixtureStatus {
    pub fn from_short(short: &str) -> Self {
        match short.trim().to_ascii_uppercase().as_str() {
            "FT" => FixtureStatus::FullTime,
            "AET" => FixtureStatus::ExtraTime,
            "PEN" => FixtureStatus::Penalties,
            other => FixtureStatus::Other(other.to_string()),
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, FixtureStatus::Other(_))
    }
}

/// Which side of a fixture a team played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Home,
    Away,
}

/// A match, as the pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub id: FixtureId,
    /// Kickoff, unix seconds (0 when unknown).
    pub kickoff: i64,
    /// Kickoff date, `YYYY-MM-DD` (empty when unknown).
    pub date: String,
    pub status: FixtureStatus,
    pub home: Side,
    pub away: Side,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl Fixture {
    pub fn from_row(row: FixtureRow) -> Self {
        let parsed = row
            .fixture
            .date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok());

        let kickoff = row
            .fixture
            .timestamp
            .or_else(|| parsed.map(|d| d.timestamp()))
            .unwrap_or(0);

        let date = match (parsed, row.fixture.timestamp) {
            (Some(d), _) => d.date_naive().format("%Y-%m-%d").to_string(),
            (None, Some(ts)) => DateTime::<Utc>::from_timestamp(ts, 0)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            (None, None) => String::new(),
        };

        Fixture {
            id: row.fixture.id,
            kickoff,
            date,
            status: FixtureStatus::from_short(&row.fixture.status.short),
            home: row.teams.home,
            away: row.teams.away,
            home_goals: row.goals.home.unwrap_or(0),
            away_goals: row.goals.away.unwrap_or(0),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn total_goals(&self) -> u32 {
        self.home_goals + self.away_goals
    }

    /// Final score as `home-away`.
    pub fn score(&self) -> String {
        format!("{}-{}", self.home_goals, self.away_goals)
    }

    pub fn opponent(&self, venue: Venue) -> &Side {
        match venue {
            Venue::Home => &self.away,
            Venue::Away => &self.home,
        }
    }
}

/// Per-fixture totals across both sides. `None` means not available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureStats {
    pub corners: Option<u32>,
    pub cards: Option<u32>,
}
