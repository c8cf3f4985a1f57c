use serde::Deserialize;
use url::Url;

/// Token rate limiting configuration
///
/// Limits admitted tokens per caller per minute bucket. Absence of this
/// section means the gateway runs unthrottled (fail-open).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Redis connection URL
    pub url: Url,
    /// Maximum tokens admitted per caller per minute
    pub tokens_per_minute: u64,
}
