//! League references as supplied by callers.

use crate::error::{BoardError, Result};
use std::fmt;
use std::str::FromStr;

use super::ids::LeagueId;

/// How a caller identifies a league: directly by ID, or by name + country.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LeagueRef {
    Id(LeagueId),
    Named { name: String, country: String },
}

impl fmt::Display for LeagueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeagueRef::Id(id) => write!(f, "{}", id),
            LeagueRef::Named { name, country } => write!(f, "{}@{}", name, country),
        }
    }
}

/// One tracked league: the reference plus the name to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueConfig {
    pub league: LeagueRef,
    pub display_name: Option<String>,
}

impl LeagueConfig {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            league: LeagueRef::Id(LeagueId::new(id)),
            display_name: Some(name.into()),
        }
    }

    pub fn named(name: impl Into<String>, country: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: Some(name.clone()),
            league: LeagueRef::Named {
                name,
                country: country.into(),
            },
        }
    }

    /// The configured league ID, if the league was given by ID.
    pub fn league_id(&self) -> Option<LeagueId> {
        match self.league {
            LeagueRef::Id(id) => Some(id),
            LeagueRef::Named { .. } => None,
        }
    }

    /// Name used in logs and in boards that failed before resolution.
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.league.to_string())
    }
}

/// Leagues tracked when the caller does not name any.
pub fn default_leagues() -> Vec<LeagueConfig> {
    vec![
        LeagueConfig::new(39, "Premier League"),
        LeagueConfig::new(140, "La Liga"),
        LeagueConfig::new(135, "Serie A"),
        LeagueConfig::new(78, "Bundesliga"),
        LeagueConfig::new(61, "Ligue 1"),
        LeagueConfig::new(262, "Liga MX"),
    ]
}

impl FromStr for LeagueConfig {
    type Err = BoardError;

    /// Accepts `39`, `39=Premier League` or `Premier League@England`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || BoardError::InvalidLeagueArg {
            input: s.to_string(),
        };

        if let Some((id, name)) = s.split_once('=') {
            let name = name.trim();
            if name.is_empty() {
                return Err(invalid());
            }
            let id: LeagueId = id.parse().map_err(|_| invalid())?;
            return Ok(LeagueConfig {
                league: LeagueRef::Id(id),
                display_name: Some(name.to_string()),
            });
        }

        if let Some((name, country)) = s.rsplit_once('@') {
            let (name, country) = (name.trim(), country.trim());
            if name.is_empty() || country.is_empty() {
                return Err(invalid());
            }
            return Ok(LeagueConfig::named(name, country));
        }

        let id: LeagueId = s.parse().map_err(|_| invalid())?;
        Ok(LeagueConfig {
            league: LeagueRef::Id(id),
            display_name: None,
        })
    }
}
