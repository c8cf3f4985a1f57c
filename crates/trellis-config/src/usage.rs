use serde::Deserialize;

/// Usage accounting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsageConfig {
    /// Postgres connection string
    pub database_url: String,
    /// Connection pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_connections() -> u32 {
    5
}
