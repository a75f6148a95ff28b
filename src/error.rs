//! Error types for the league board pipeline

use thiserror::Error;


pub type Result<T> = std::result::Result<T, BoardError>;

pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Longest slice of an error body we keep around.
pub const MAX_ERROR_BODY: usize = 200;

/// Failures of a single upstream request, after the client's own retries.
///
/// Cloneable so that a failed response can sit in the response cache for a
/// short while and be replayed to later callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("API credential not configured: set the {env_var} environment variable")]
    MissingCredential { env_var: String },

    #[error("Rate limited by upstream after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network failure after {attempts} attempts: {message}")]
    Transport { attempts: u32, message: String },

    #[error("Could not decode upstream response: {message}")]
    Decode { message: String },

    #[error("Upstream reported an error: {message}")]
    Upstream { message: String },
}

impl FetchError {
    /// Build a `Status` error, truncating the body on a char boundary.
    pub fn status(status: u16, body: &str) -> Self {
        FetchError::Status {
            status,
            body: truncate_body(body),
        }
    }

    /// Whether the error is worth remembering in the response cache.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, FetchError::MissingCredential { .. })
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode {
            message: err.to_string(),
        }
    }
}

pub fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[derive(Error, Debug)]
pub enum BoardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No seasons found for league {league}")]
    NoSeasons { league: String },

    #[error("Upstream returned an empty roster for league {league} season {season}")]
    EmptyRoster { league: String, season: u16 },

    #[error("No league matches {query}")]
    UnknownLeague { query: String },

    #[error("Invalid league '{input}': expected ID, ID=Name or Name@Country")]
    InvalidLeagueArg { input: String },

    #[error("Failed to parse ID: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
