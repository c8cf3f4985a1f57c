use serde::Deserialize;
use url::Url;

/// Response cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Redis connection URL
    pub url: Url,
    /// TTL in seconds for cached responses
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

#[allow(clippy::missing_const_for_fn)]
fn default_ttl_seconds() -> u64 {
    3600
}
