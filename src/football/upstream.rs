//! The seam between the pipeline and whatever serves football data.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::core::CacheTtl;
use crate::error::{FetchError, FetchResult};

/// A GET request against the upstream: path, query parameters and how long
/// a successful answer may be cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    path: String,
    params: Vec<(String, String)>,
    ttl: CacheTtl,
    refresh: bool,
}

impl Query {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
            ttl: CacheTtl::Default,
            refresh: false,
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a parameter only when it has a value.
    pub fn param_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn ttl(mut self, ttl: CacheTtl) -> Self {
        self.ttl = ttl;
        self
    }

    /// Skip the cache read (the fresh answer is still stored).
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn cache_ttl(&self) -> CacheTtl {
        self.ttl
    }

    pub fn is_refresh(&self) -> bool {
        self.refresh
    }

    /// Stable identity of the request: path plus params sorted by key.
    pub fn cache_key(&self) -> String {
        let mut params: Vec<_> = self.params.iter().collect();
        params.sort();
        if params.is_empty() {
            return self.path.clone();
        }
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

/// Source of upstream JSON envelopes.
///
/// Implementations never panic for expected failures; every outcome comes
/// back as a [`FetchResult`].
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(&self, query: &Query) -> FetchResult<Value>;
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    response: Value,
}

/// Decode the `response` rows of an envelope, skipping rows that don't fit `T`.
pub fn decode_rows<T: DeserializeOwned>(value: Value) -> FetchResult<Vec<T>> {
    let envelope: Envelope = serde_json::from_value(value)?;
    let rows = match envelope.response {
        Value::Array(rows) => rows,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(FetchError::Decode {
                message: format!("expected a response array, got {}", json_kind(&other)),
            })
        }
    };

    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect();
    if decoded.len() < total {
        debug!(skipped = total - decoded.len(), "skipped malformed rows");
    }
    Ok(decoded)
}

/// Fetch a query and decode its rows.
pub async fn fetch_rows<T, U>(upstream: &U, query: &Query) -> FetchResult<Vec<T>>
where
    T: DeserializeOwned,
    U: Upstream + ?Sized,
{
    decode_rows(upstream.fetch(query).await?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
