//! Shared builders for the mocked-upstream integration tests

#![allow(dead_code)]

use league_board::{
    config::ClientConfig,
    core::{CacheConfig, ResponseCache, RetryPolicy},
    football::ApiClient,
};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub const TEST_KEY: &str = "test-key";

/// Client against the mock server, with millisecond backoff.
pub fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(ClientConfig::new(server.uri(), Some(TEST_KEY.to_string())))
        .unwrap()
        .with_retry(RetryPolicy::immediate(6))
}

/// Same as [`client`], plus an in-memory response cache.
pub fn cached_client(server: &MockServer) -> (ApiClient, Arc<ResponseCache>) {
    let cache = Arc::new(ResponseCache::new(CacheConfig::default()));
    (client(server).with_cache(cache.clone()), cache)
}

pub fn envelope(rows: Value) -> Value {
    json!({"get": "", "parameters": {}, "errors": [], "results": 0, "paging": {"current": 1, "total": 1}, "response": rows})
}

pub fn fixture(
    id: u64,
    date: &str,
    status: &str,
    home: (u64, &str),
    away: (u64, &str),
    goals: (u32, u32),
) -> Value {
    json!({
        "fixture": {"id": id, "date": date, "status": {"long": "", "short": status}},
        "league": {"id": 39, "season": 2025},
        "teams": {
            "home": {"id": home.0, "name": home.1},
            "away": {"id": away.0, "name": away.1}
        },
        "goals": {"home": goals.0, "away": goals.1}
    })
}

/// Per-side statistics: `(team, corners, yellow, red)`.
pub fn statistics(home: (u64, u32, u32, u32), away: (u64, u32, u32, u32)) -> Value {
    let side = |(team, corners, yellow, red): (u64, u32, u32, u32)| {
        json!({
            "team": {"id": team},
            "statistics": [
                {"type": "Shots on Goal", "value": 5},
                {"type": "Corner Kicks", "value": corners},
                {"type": "Ball Possession", "value": "50%"},
                {"type": "Yellow Cards", "value": yellow},
                {"type": "Red Cards", "value": if red == 0 { Value::Null } else { json!(red) }}
            ]
        })
    };
    json!([side(home), side(away)])
}
