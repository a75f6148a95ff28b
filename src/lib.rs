//! League Board Library
//!
//! Builds a "last matches per team" board for football leagues from a
//! rate-limited upstream API (API-Football v3 shape).
//!
//! ## Pipeline
//!
//! 1. Resolve each league's season and roster
//! 2. Fetch the season's finished fixtures in bulk, topping up from the
//!    previous season and per-team lookups where a team is short
//! 3. Look up corners and cards once per displayed fixture, with bounded
//!    concurrency
//! 4. Assemble exactly N slots per team, padded with blanks
//!
//! Failures stay inside the league they happened in: every league yields a
//! [`LeagueBoard`], possibly with an `error` set.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use league_board::{
//!     config::{BoardConfig, ClientConfig},
//!     football::ApiClient,
//!     get_league_boards, LeagueConfig,
//! };
//!
//! # async fn example() -> league_board::Result<()> {
//! let client = ApiClient::new(ClientConfig::from_env())?;
//! let leagues = [LeagueConfig::new(39, "Premier League")];
//! let boards = get_league_boards(&client, &leagues, &BoardConfig::default()).await;
//! println!("{}", serde_json::to_string_pretty(&boards)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export API_FOOTBALL_KEY=your-key
//! export API_FOOTBALL_BASE_URL=https://v3.football.api-sports.io  # optional
//! ```

pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod football;
pub mod logging;

// Re-export commonly used types
pub use board::{get_league_boards, LeagueBoard, MatchSlot, TeamBoard};
pub use cli::types::{FixtureId, LeagueConfig, LeagueId, LeagueRef, Season, TeamId};
pub use error::{BoardError, FetchError, Result};

pub const API_KEY_ENV_VAR: &str = "API_FOOTBALL_KEY";

pub const BASE_URL_ENV_VAR: &str = "API_FOOTBALL_BASE_URL";
