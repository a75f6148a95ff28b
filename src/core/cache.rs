//! Response cache for upstream requests
//!
//! Two tiers, as in a classic L1/L2 setup:
//! - L1: in-memory LRU with a per-entry expiry
//! - L2: optional JSON files on disk, only for long-lived entries
//!   (statistics of finished matches), so they survive restarts
//!
//! Entries are replaced wholesale, never mutated in place. Error responses
//! and empty payloads are kept only for the short error TTL.

use lru::LruCache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs,
    io::{Read, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};
use tracing::debug;

use crate::error::FetchResult;

/// Directory name under the user cache dir.
pub const CACHE_DIR_NAME: &str = "league-board";

/// Path: ~/.cache/league-board
pub fn default_cache_dir() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join(CACHE_DIR_NAME)
}

/// Try to read a file into a String
pub fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();

    f.read_to_string(&mut s).ok()?;

    Some(s)
}

/// Write a string to file
pub fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut f = fs::File::create(path)?;
    f.write_all(contents.as_bytes())
}

/// Lifetime class a caller picks for a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheTtl {
    /// League metadata, rosters, fixture lists.
    #[default]
    Default,
    /// Data about finished matches, which never changes once published.
    Finished,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub capacity: usize,
    pub default_ttl: Duration,
    pub finished_ttl: Duration,
    pub error_ttl: Duration,
    /// Enables the on-disk tier for `CacheTtl::Finished` entries.
    pub disk_dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 512,
            default_ttl: Duration::from_secs(10 * 60),
            finished_ttl: Duration::from_secs(6 * 60 * 60),
            error_ttl: Duration::from_secs(30),
            disk_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: FetchResult<Value>,
    expires_at: Instant,
}

#[derive(Debug, Serialize, Deserialize)]
struct DiskEntry {
    stored_at: u64,
    ttl_secs: u64,
    body: Value,
}

/// Whether a payload is an envelope with no rows.
///
/// Such responses are valid but usually mean "not published yet", so they
/// get the short TTL.
pub fn is_empty_payload(value: &Value) -> bool {
    value
        .get("response")
        .and_then(Value::as_array)
        .is_some_and(|rows| rows.is_empty())
}

/// Cache keyed by request (path + sorted query string).
pub struct ResponseCache {
    memory: Mutex<LruCache<String, MemoryEntry>>,
    config: CacheConfig,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            memory: Mutex::new(LruCache::new(capacity)),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn memory(&self) -> MutexGuard<'_, LruCache<String, MemoryEntry>> {
        self.memory.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get a live entry (checks memory first, then disk).
    pub fn get(&self, key: &str) -> Option<FetchResult<Value>> {
        {
            let mut memory = self.memory();
            let cached = memory
                .get(key)
                .map(|entry| (entry.expires_at > Instant::now(), entry.value.clone()));
            match cached {
                Some((true, value)) => {
                    debug!(key, "cache hit");
                    return Some(value);
                }
                Some((false, _)) => {
                    memory.pop(key);
                }
                None => {}
            }
        }

        let (body, remaining) = self.get_from_disk(key)?;
        debug!(key, "disk cache hit");
        self.memory().put(
            key.to_string(),
            MemoryEntry {
                value: Ok(body.clone()),
                expires_at: Instant::now() + remaining,
            },
        );
        Some(Ok(body))
    }

    /// Store a response. Returns the TTL actually applied, or `None` when
    /// the response is not cacheable.
    pub fn put(&self, key: &str, value: &FetchResult<Value>, class: CacheTtl) -> Option<Duration> {
        let ttl = match value {
            Err(e) if !e.is_cacheable() => return None,
            Err(_) => self.config.error_ttl,
            Ok(v) if is_empty_payload(v) => self.config.error_ttl,
            Ok(_) => match class {
                CacheTtl::Default => self.config.default_ttl,
                CacheTtl::Finished => self.config.finished_ttl,
            },
        };

        self.memory().put(
            key.to_string(),
            MemoryEntry {
                value: value.clone(),
                expires_at: Instant::now() + ttl,
            },
        );

        if let (Ok(body), CacheTtl::Finished) = (value, class) {
            if ttl == self.config.finished_ttl {
                if let Err(e) = self.put_to_disk(key, body, ttl) {
                    debug!(key, error = %e, "could not persist cache entry");
                }
            }
        }

        Some(ttl)
    }

    /// Entries currently held in memory, expired ones included.
    pub fn len(&self) -> usize {
        self.memory().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn disk_path(&self, key: &str) -> Option<PathBuf> {
        let dir = self.config.disk_dir.as_ref()?;
        Some(dir.join(format!("{}.json", file_key(key))))
    }

    fn get_from_disk(&self, key: &str) -> Option<(Value, Duration)> {
        let path = self.disk_path(key)?;
        let content = try_read_to_string(&path)?;
        let entry: DiskEntry = serde_json::from_str(&content).ok()?;
        let expires = entry.stored_at.saturating_add(entry.ttl_secs);
        let now = unix_now();
        if expires <= now {
            return None;
        }
        Some((entry.body, Duration::from_secs(expires - now)))
    }

    fn put_to_disk(&self, key: &str, body: &Value, ttl: Duration) -> std::io::Result<()> {
        let Some(path) = self.disk_path(key) else {
            return Ok(());
        };
        let entry = DiskEntry {
            stored_at: unix_now(),
            ttl_secs: ttl.as_secs(),
            body: body.clone(),
        };
        let content = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        write_string(&path, &content)
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// File-system safe form of a cache key.
fn file_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
