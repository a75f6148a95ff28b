//! HTTP utilities for upstream API communication

use crate::error::FetchError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};

/// Header carrying the provider API key.
pub const API_KEY_HEADER: &str = "x-apisports-key";

/// Build the auth headers from the configured API key.
///
/// A missing or blank key is a configuration error, reported without
/// touching the network.
pub fn auth_header_map(api_key: Option<&str>, env_var: &str) -> Result<HeaderMap, FetchError> {
    let missing = || FetchError::MissingCredential {
        env_var: env_var.to_string(),
    };
    let key = api_key.map(str::trim).filter(|k| !k.is_empty()).ok_or_else(missing)?;

    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let value = HeaderValue::from_str(key).map_err(|_| missing())?;
    h.insert(HeaderName::from_static(API_KEY_HEADER), value);
    Ok(h)
}

/// Parse a `Retry-After` header given in whole seconds.
pub fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
