//! In-memory upstream for unit tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::upstream::{Query, Upstream};
use crate::error::{FetchError, FetchResult};

/// Answers queries from a route table keyed by `Query::cache_key`, and
/// records every call with its start time. Unknown routes answer with an
/// empty envelope.
#[derive(Default)]
pub struct FakeUpstream {
    routes: HashMap<String, FetchResult<Value>>,
    calls: Mutex<Vec<(String, Instant)>>,
    latency: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, rows: Value) -> Self {
        self.routes
            .insert(key.to_string(), Ok(json!({ "response": rows })));
        self
    }

    pub fn failing(mut self, key: &str, error: FetchError) -> Self {
        self.routes.insert(key.to_string(), Err(error));
        self
    }

    /// Hold every answer for `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn call_times(&self, prefix: &str) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(_, at)| *at)
            .collect()
    }

    /// Most calls that were ever running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls_to(&self, key: &str) -> usize {
        self.calls().iter().filter(|k| k.as_str() == key).count()
    }

    pub fn calls_with_prefix(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|k| k.starts_with(prefix)).count()
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn fetch(&self, query: &Query) -> FetchResult<Value> {
        let key = query.cache_key();
        self.calls.lock().unwrap().push((key.clone(), Instant::now()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.routes
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Ok(json!({ "response": [] })))
    }
}

pub fn league_rows(id: u32, name: &str, seasons: &[(u16, bool)]) -> Value {
    let seasons: Vec<Value> = seasons
        .iter()
        .map(|(year, current)| json!({"year": year, "current": current}))
        .collect();
    json!([{ "league": {"id": id, "name": name}, "country": {"name": "Testland"}, "seasons": seasons }])
}

pub fn team_rows(teams: &[(u64, &str)]) -> Value {
    Value::Array(
        teams
            .iter()
            .map(|(id, name)| json!({"team": {"id": id, "name": name, "logo": format!("https://logos.test/{id}.png")}}))
            .collect(),
    )
}

/// A fixture row; `home`/`away` are `(id, name)`, goals are `(home, away)`.
pub fn fixture_row(
    id: u64,
    timestamp: i64,
    home: (u64, &str),
    away: (u64, &str),
    goals: (u32, u32),
    status: &str,
) -> Value {
    json!({
        "fixture": {"id": id, "timestamp": timestamp, "status": {"short": status}},
        "teams": {
            "home": {"id": home.0, "name": home.1},
            "away": {"id": away.0, "name": away.1}
        },
        "goals": {"home": goals.0, "away": goals.1}
    })
}

/// Statistics rows for both sides: `(corners, yellow, red)` per side.
pub fn statistics_rows(home: (u32, u32, u32), away: (u32, u32, u32)) -> Value {
    let side = |(corners, yellow, red): (u32, u32, u32)| {
        json!({"statistics": [
            {"type": "Shots on Goal", "value": 4},
            {"type": "Corner Kicks", "value": corners},
            {"type": "Yellow Cards", "value": yellow},
            {"type": "Red Cards", "value": if red == 0 { Value::Null } else { json!(red) }}
        ]})
    };
    json!([side(home), side(away)])
}

pub fn card_events(yellow: usize, red: usize) -> Value {
    let mut events = Vec::new();
    events.extend((0..yellow).map(|_| json!({"type": "Card", "detail": "Yellow Card"})));
    events.extend((0..red).map(|_| json!({"type": "Card", "detail": "Red Card"})));
    Value::Array(events)
}
