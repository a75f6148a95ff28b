//! Core utilities shared by the pipeline
//!
//! - `cache`: response cache (memory LRU + optional disk tier)
//! - `http`: auth headers and response header helpers
//! - `limiter`: bounded concurrency for upstream calls
//! - `retry`: backoff schedules

pub mod cache;
pub mod http;
pub mod limiter;
pub mod retry;

// Re-export commonly used items for convenience
pub use cache::{default_cache_dir, write_string, CacheConfig, CacheTtl, ResponseCache};
pub use limiter::Limiter;
pub use retry::{Backoff, RetryPolicy};
