use serde::Deserialize;

/// A named routing policy mapping a use-case to a provider/model target
///
/// Routes are loaded once at startup and never mutated; the router holds
/// them in configuration order and evaluates first-match-wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Unique route name; the route named `"default"` is the configured
    /// fallback when no use-case matches
    pub name: String,
    /// Match predicate
    #[serde(rename = "match")]
    pub matcher: RouteMatch,
    /// Primary provider/model target
    pub primary: Target,
    /// Maximum attempts against the target before giving up
    #[serde(default = "default_retries")]
    pub retries: u32,
}

/// Route match predicate
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteMatch {
    /// Use-case label compared for exact equality
    pub use_case: String,
}

/// A provider + model pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Target {
    /// Provider identifier (key into the provider registry)
    pub provider: String,
    /// Model identifier sent to the provider
    pub model: String,
}

const fn default_retries() -> u32 {
    1
}
