//! Football data acquisition: the upstream client and the pipeline stages
//! that turn its payloads into per-team match lists.

pub mod client;
pub mod fixtures;
pub mod names;
pub mod resolve;
pub mod stats;
pub mod types;
pub mod upstream;

#[cfg(test)]
pub(crate) mod fake;

pub use client::ApiClient;
pub use fixtures::{aggregate, Aggregation, TeamFixture, TeamMatches};
pub use resolve::{resolve_roster, resolve_season, ResolvedLeague, Roster, RosterTeam};
pub use stats::StatFetcher;
pub use types::{Fixture, FixtureStats, Team};
pub use upstream::{Query, Upstream};
