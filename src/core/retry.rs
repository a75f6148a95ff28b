//! Backoff schedules shared by every upstream request.
//!
//! The fetch client keeps two independent schedules: one for HTTP 429
//! responses and a shorter one for 5xx and network failures.

use std::time::Duration;

/// Exponential backoff: `base * 2^(attempt-1)`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base: Duration,
    pub max: Duration,
    /// Total attempts allowed before giving up, including the first.
    pub max_attempts: u32,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration, max_attempts: u32) -> Self {
        Self {
            base,
            max,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Delay to wait after the `attempt`-th failure (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.base
            .checked_mul(1u32 << exp)
            .unwrap_or(self.max)
            .min(self.max)
    }

    /// Like [`Backoff::delay`], but never shorter than a server hint.
    pub fn delay_with_hint(&self, attempt: u32, hint: Option<Duration>) -> Duration {
        let computed = self.delay(attempt);
        match hint {
            Some(hint) => computed.max(hint).min(self.max),
            None => computed,
        }
    }

    /// Whether another attempt is allowed after `failures` failures.
    pub fn allows_retry(&self, failures: u32) -> bool {
        failures < self.max_attempts
    }
}

/// Retry schedules used by the fetch client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub rate_limit: Backoff,
    pub transient: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            rate_limit: Backoff::new(Duration::from_millis(800), Duration::from_secs(16), 6),
            transient: Backoff::new(Duration::from_millis(300), Duration::from_secs(4), 4),
        }
    }
}

impl RetryPolicy {
    /// A policy with millisecond delays, for tests and local mocks.
    pub fn immediate(max_attempts: u32) -> Self {
        let backoff = Backoff::new(Duration::from_millis(1), Duration::from_millis(4), max_attempts);
        Self {
            rate_limit: backoff,
            transient: backoff,
        }
    }
}
