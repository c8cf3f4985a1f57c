#![allow(clippy::must_use_candidate)]

pub mod cache;
mod loader;
pub mod rate_limit;
pub mod route;
pub mod usage;

use serde::Deserialize;

pub use cache::CacheConfig;
pub use rate_limit::RateLimitConfig;
pub use route::{RouteConfig, RouteMatch, Target};
pub use usage::UsageConfig;

/// Top-level gateway configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Ordered route definitions, evaluated first-match-wins
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
    /// Response cache configuration
    #[serde(default)]
    pub cache: Option<CacheConfig>,
    /// Token rate limiting configuration
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
    /// Usage accounting configuration
    #[serde(default)]
    pub usage: Option<UsageConfig>,
}
