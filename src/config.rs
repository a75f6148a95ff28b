//! Runtime configuration for the client and the board pipeline.

use std::time::Duration;

use crate::{API_KEY_ENV_VAR, BASE_URL_ENV_VAR};

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";

/// Number of match slots every team gets.
pub const DEFAULT_SLOTS: usize = 7;

/// Connection settings for the upstream API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            timeout: Duration::from_secs(20),
            user_agent: format!("league-board/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Read `API_FOOTBALL_KEY` and `API_FOOTBALL_BASE_URL`.
    ///
    /// A missing key is not an error here; it surfaces on the first request.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV_VAR)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = std::env::var(API_KEY_ENV_VAR)
            .ok()
            .filter(|s| !s.trim().is_empty());
        Self::new(base_url, api_key)
    }
}

/// Knobs for the aggregation pipeline.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Match slots per team.
    pub slots: usize,
    /// In-flight per-fixture lookups.
    pub stats_concurrency: usize,
    /// Pause before each per-fixture lookup is dispatched.
    pub dispatch_delay: Duration,
    /// Attempts per statistics lookup when the upstream has nothing yet.
    pub stat_attempts: u32,
    /// Linear backoff step between statistics attempts.
    pub stat_retry_delay: Duration,
    /// Pull the previous season's fixtures when a team is short of matches.
    pub merge_previous_season: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS,
            stats_concurrency: 2,
            dispatch_delay: Duration::from_millis(250),
            stat_attempts: 3,
            stat_retry_delay: Duration::from_secs(1),
            merge_previous_season: true,
        }
    }
}

impl BoardConfig {
    /// Same shape as the default, without any waiting. Meant for mocks.
    pub fn immediate() -> Self {
        Self {
            dispatch_delay: Duration::ZERO,
            stat_retry_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
