//! HTTP client for the football API.
//!
//! Every request goes through [`ApiClient::fetch`]: credential check, cache
//! lookup, then a retry loop with separate schedules for rate limiting and
//! transient failures. Whatever the loop ends with, success or error, is
//! written back to the cache.

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, StatusCode};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

use super::upstream::{Query, Upstream};
use crate::{
    config::ClientConfig,
    core::{
        http::{auth_header_map, retry_after_secs},
        ResponseCache, RetryPolicy,
    },
    error::{FetchError, FetchResult, Result},
    API_KEY_ENV_VAR,
};

/// Outcome of a single HTTP attempt.
enum Attempt {
    Done(FetchResult<Value>),
    RateLimited(Option<Duration>),
    Transient(FetchError),
}

pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    retry: RetryPolicy,
    cache: Option<Arc<ResponseCache>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            config,
            retry: RetryPolicy::default(),
            cache: None,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn attempt_once(&self, query: &Query, headers: &HeaderMap) -> Attempt {
        let response = match self
            .http
            .get(self.url(query.path()))
            .headers(headers.clone())
            .query(query.params())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return Attempt::Transient(FetchError::Transport {
                    attempts: 1,
                    message: e.to_string(),
                })
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let hint = retry_after_secs(response.headers()).map(Duration::from_secs);
            return Attempt::RateLimited(hint);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Attempt::Transient(FetchError::Transport {
                    attempts: 1,
                    message: e.to_string(),
                })
            }
        };

        if status.is_server_error() {
            return Attempt::Transient(FetchError::status(status.as_u16(), &body));
        }
        if !status.is_success() {
            return Attempt::Done(Err(FetchError::status(status.as_u16(), &body)));
        }

        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) => return Attempt::Done(Err(e.into())),
        };
        classify_envelope(value)
    }

    async fn fetch_uncached(&self, query: &Query, headers: &HeaderMap) -> FetchResult<Value> {
        let mut rate_limited = 0u32;
        let mut transient = 0u32;

        loop {
            match self.attempt_once(query, headers).await {
                Attempt::Done(result) => return result,
                Attempt::RateLimited(hint) => {
                    rate_limited += 1;
                    let schedule = self.retry.rate_limit;
                    if !schedule.allows_retry(rate_limited) {
                        warn!(%query, attempts = rate_limited, "rate limit retries exhausted");
                        return Err(FetchError::RateLimited {
                            attempts: rate_limited,
                        });
                    }
                    let delay = schedule.delay_with_hint(rate_limited, hint);
                    warn!(%query, attempt = rate_limited, ?delay, "rate limited, backing off");
                    tokio::time::sleep(delay).await;
                }
                Attempt::Transient(error) => {
                    transient += 1;
                    let schedule = self.retry.transient;
                    if !schedule.allows_retry(transient) {
                        warn!(%query, attempts = transient, %error, "giving up after transient failures");
                        return Err(match error {
                            FetchError::Transport { message, .. } => FetchError::Transport {
                                attempts: transient,
                                message,
                            },
                            other => other,
                        });
                    }
                    let delay = schedule.delay(transient);
                    warn!(%query, attempt = transient, ?delay, %error, "transient failure, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Inspect the `errors` member of a 2xx envelope.
///
/// The upstream reports some failures with HTTP 200: per-minute throttling
/// (`rateLimit`), an exhausted daily quota (`requests`) and bad parameters.
/// Empty `[]` or `{}` means no error.
fn classify_envelope(value: Value) -> Attempt {
    let errors = match value.get("errors") {
        Some(Value::Object(map)) if !map.is_empty() => map,
        Some(Value::Array(list)) if !list.is_empty() => {
            let message = list
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join("; ");
            return Attempt::Done(Err(FetchError::Upstream { message }));
        }
        _ => return Attempt::Done(Ok(value)),
    };

    if errors.contains_key("rateLimit") {
        return Attempt::RateLimited(None);
    }
    if errors.contains_key("requests") {
        return Attempt::Done(Err(FetchError::RateLimited { attempts: 1 }));
    }
    let message = errors
        .iter()
        .map(|(k, v)| match v.as_str() {
            Some(s) => format!("{k}: {s}"),
            None => format!("{k}: {v}"),
        })
        .collect::<Vec<_>>()
        .join("; ");
    Attempt::Done(Err(FetchError::Upstream { message }))
}

#[async_trait]
impl Upstream for ApiClient {
    async fn fetch(&self, query: &Query) -> FetchResult<Value> {
        let headers = auth_header_map(self.config.api_key.as_deref(), API_KEY_ENV_VAR)?;

        if let Some(cache) = &self.cache {
            if !query.is_refresh() {
                if let Some(hit) = cache.get(&query.cache_key()) {
                    debug!(%query, "cache hit");
                    return hit;
                }
            }
        }

        debug!(%query, "requesting");
        let result = self.fetch_uncached(query, &headers).await;

        if let Some(cache) = &self.cache {
            cache.put(&query.cache_key(), &result, query.cache_ttl());
        }
        result
    }
}
