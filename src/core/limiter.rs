//! Concurrency limiter for upstream calls.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

type Pacer = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Bounds the number of in-flight futures, and optionally spaces out
/// their starts.
///
/// Waiters are admitted in FIFO order (tokio's semaphore is fair). The
/// permit is held by a guard, so a slot is released when the wrapped
/// future completes, fails, or is dropped. A paced limiter lets one future
/// start per spacing period across all slots.
#[derive(Clone)]
pub struct Limiter {
    permits: Arc<Semaphore>,
    pacer: Option<Arc<Pacer>>,
    bound: usize,
}

impl Limiter {
    pub fn new(bound: usize) -> Self {
        let bound = bound.max(1);
        Self {
            permits: Arc::new(Semaphore::new(bound)),
            pacer: None,
            bound,
        }
    }

    /// Like [`Limiter::new`], with starts at least `spacing` apart.
    /// A zero spacing disables pacing.
    pub fn paced(bound: usize, spacing: Duration) -> Self {
        Self {
            pacer: Quota::with_period(spacing).map(|quota| Arc::new(RateLimiter::direct(quota))),
            ..Self::new(bound)
        }
    }

    /// Run `fut` once a slot is free and the pacer allows a start.
    pub async fn run<F, T>(&self, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        // The semaphore is never closed, so acquire only fails in theory;
        // in that case the call simply runs unbounded.
        let _permit = self.permits.acquire().await.ok();
        if let Some(pacer) = &self.pacer {
            pacer.until_ready().await;
        }
        fut.await
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn is_paced(&self) -> bool {
        self.pacer.is_some()
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

impl fmt::Debug for Limiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Limiter")
            .field("bound", &self.bound)
            .field("available", &self.available())
            .field("paced", &self.is_paced())
            .finish()
    }
}
