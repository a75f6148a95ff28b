//! Type-safe wrappers for leagues, seasons and upstream IDs.

pub mod ids;
pub mod league;
pub mod time;

pub use ids::{FixtureId, LeagueId, TeamId};
pub use league::{default_leagues, LeagueConfig, LeagueRef};
pub use time::Season;
