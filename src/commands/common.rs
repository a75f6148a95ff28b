//! Helpers shared by every command.

use std::sync::Arc;
use tracing::debug;

use crate::{
    cli::ClientArgs,
    config::ClientConfig,
    core::{default_cache_dir, CacheConfig, ResponseCache},
    football::ApiClient,
    Result,
};

/// Cache settings for the given flags: memory only unless `--disk-cache`.
pub fn cache_config(args: &ClientArgs) -> CacheConfig {
    let disk_dir = args
        .disk_cache
        .then(|| args.cache_dir.clone().unwrap_or_else(default_cache_dir));
    CacheConfig {
        disk_dir,
        ..CacheConfig::default()
    }
}

/// Client configuration from the environment, overridden by flags.
pub fn client_config(args: &ClientArgs) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    config
}

/// Build the API client with its response cache.
pub fn build_client(args: &ClientArgs) -> Result<ApiClient> {
    let config = client_config(args);
    let cache = cache_config(args);
    debug!(base_url = %config.base_url, disk_cache = ?cache.disk_dir, "building client");
    Ok(ApiClient::new(config)?.with_cache(Arc::new(ResponseCache::new(cache))))
}

/// Render an optional count, `-` when unavailable.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
