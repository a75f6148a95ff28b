//! Per-fixture corner and card totals.
//!
//! Only the fixtures that end up on the board are looked up, each at most
//! once per build. Lookups run through a paced [`Limiter`], so starts are
//! spread out over the upstream's per-minute budget. A failed or
//! empty lookup yields `None` for the affected total; it never drops the
//! fixture.

use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use super::{
    types::{EventRow, FixtureStats, StatisticsRow},
    upstream::{fetch_rows, Query, Upstream},
};
use crate::{
    cli::types::FixtureId,
    config::BoardConfig,
    core::{CacheTtl, Limiter},
    error::FetchError,
};

const CORNER_KICKS: &str = "Corner Kicks";
const YELLOW_CARDS: &str = "Yellow Cards";
const RED_CARDS: &str = "Red Cards";

/// Read a metric value: a number, a numeric string (`"55%"`), or `null`
/// which the upstream uses for zero.
pub fn stat_value(value: &Value) -> Option<u32> {
    match value {
        Value::Null => Some(0),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

/// Sum a metric over both participants. `None` when no side reports it.
pub fn metric_total(rows: &[StatisticsRow], metric: &str) -> Option<u32> {
    let values: Vec<u32> = rows
        .iter()
        .flat_map(|row| row.statistics.iter())
        .filter(|item| item.kind.eq_ignore_ascii_case(metric))
        .filter_map(|item| stat_value(&item.value))
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum())
    }
}

/// Yellow and red cards in an events feed. A second yellow is booked as a red.
pub fn count_cards(events: &[EventRow]) -> (u32, u32) {
    events
        .iter()
        .filter(|e| e.kind.eq_ignore_ascii_case("card"))
        .fold((0, 0), |(yellow, red), event| {
            let detail = event.detail.as_deref().unwrap_or_default().to_lowercase();
            if detail.contains("red") || detail.contains("second yellow") {
                (yellow, red + 1)
            } else if detail.contains("yellow") {
                (yellow + 1, red)
            } else {
                (yellow, red)
            }
        })
}

/// Card total from the statistics metrics, when either is reported.
pub fn cards_from_statistics(rows: &[StatisticsRow]) -> Option<u32> {
    match (metric_total(rows, YELLOW_CARDS), metric_total(rows, RED_CARDS)) {
        (None, None) => None,
        (yellow, red) => Some(yellow.unwrap_or(0) + red.unwrap_or(0)),
    }
}

/// Looks up statistics for a set of fixtures with bounded concurrency.
pub struct StatFetcher<'a, U: ?Sized> {
    upstream: &'a U,
    limiter: Limiter,
    config: &'a BoardConfig,
}

impl<'a, U> StatFetcher<'a, U>
where
    U: Upstream + ?Sized,
{
    pub fn new(upstream: &'a U, config: &'a BoardConfig) -> Self {
        Self {
            upstream,
            limiter: Limiter::paced(config.stats_concurrency, config.dispatch_delay),
            config,
        }
    }

    /// Totals for every fixture in `ids`. Blank IDs are skipped.
    pub async fn stats_for(&self, ids: &BTreeSet<FixtureId>) -> BTreeMap<FixtureId, FixtureStats> {
        let this = self;
        let lookups = ids
            .iter()
            .copied()
            .filter(|id| !id.is_blank())
            .map(move |id| this.limiter.run(async move { (id, this.fixture_stats(id).await) }));
        join_all(lookups).await.into_iter().collect()
    }

    async fn fixture_stats(&self, id: FixtureId) -> FixtureStats {
        let rows = self.statistics(id).await;
        let corners = rows.as_deref().and_then(|r| metric_total(r, CORNER_KICKS));

        let cards = match self.card_events(id).await {
            Some(events) if !events.is_empty() => {
                let (yellow, red) = count_cards(&events);
                Some(yellow + red)
            }
            _ => rows.as_deref().and_then(cards_from_statistics),
        };

        debug!(fixture = %id, ?corners, ?cards, "fixture stats");
        FixtureStats { corners, cards }
    }

    /// Statistics rows, retried while the upstream has nothing yet.
    async fn statistics(&self, id: FixtureId) -> Option<Vec<StatisticsRow>> {
        let query = Query::new("/fixtures/statistics").param("fixture", id);
        self.rows_with_retry(id, query, true).await
    }

    /// Card events. An empty feed is a valid answer (no cards, or no feed
    /// for this competition), so only failures are retried.
    async fn card_events(&self, id: FixtureId) -> Option<Vec<EventRow>> {
        let query = Query::new("/fixtures/events")
            .param("fixture", id)
            .param("type", "Card");
        self.rows_with_retry(id, query, false).await
    }

    /// Bounded linear-backoff retry around one per-fixture lookup. Throttling
    /// and transport failures are retried; other errors give up at once.
    /// Attempts after the first skip the cache read.
    async fn rows_with_retry<T>(
        &self,
        id: FixtureId,
        query: Query,
        retry_empty: bool,
    ) -> Option<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let attempts = self.config.stat_attempts.max(1);
        let query = query.ttl(CacheTtl::Finished);
        for attempt in 1..=attempts {
            let query = query.clone().refresh(attempt > 1);

            match fetch_rows::<T, _>(self.upstream, &query).await {
                Ok(rows) if !rows.is_empty() || !retry_empty => return Some(rows),
                Ok(_) => debug!(fixture = %id, path = query.path(), attempt, "not published yet"),
                Err(e @ (FetchError::RateLimited { .. } | FetchError::Transport { .. })) => {
                    warn!(fixture = %id, path = query.path(), attempt, error = %e, "lookup failed")
                }
                Err(e) => {
                    warn!(fixture = %id, path = query.path(), error = %e, "lookup unavailable");
                    return None;
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.config.stat_retry_delay * attempt).await;
            }
        }
        None
    }
}
