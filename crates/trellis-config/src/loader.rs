use std::collections::HashSet;
use std::path::Path;

use crate::GatewayConfig;

impl GatewayConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails,
    /// or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config: Self = toml::from_str(&raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate route names or a zero retry count
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut names = HashSet::new();
        for route in &self.routes {
            if !names.insert(route.name.as_str()) {
                anyhow::bail!("duplicate route name '{}'", route.name);
            }
            if route.retries == 0 {
                anyhow::bail!("route '{}' must allow at least one attempt", route.name);
            }
        }

        if let Some(rate_limit) = &self.rate_limit
            && rate_limit.enabled
            && rate_limit.tokens_per_minute == 0
        {
            anyhow::bail!("rate_limit.tokens_per_minute must be positive when enabled");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"
        [[routes]]
        name = "summaries"
        match = { use_case = "summarize" }
        primary = { provider = "anthropic", model = "claude-3-5-sonnet" }
        retries = 2

        [[routes]]
        name = "default"
        match = { use_case = "" }
        primary = { provider = "openai", model = "gpt-4o-mini" }

        [cache]
        enabled = true
        url = "redis://localhost:6379"
        ttl_seconds = 600

        [rate_limit]
        enabled = true
        url = "redis://localhost:6379"
        tokens_per_minute = 100000

        [usage]
        database_url = "postgres://localhost/trellis"
    "#;

    #[test]
    fn loads_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = GatewayConfig::load(file.path()).unwrap();
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].retries, 2);
        // Unspecified retries fall back to 1
        assert_eq!(config.routes[1].retries, 1);
        assert_eq!(config.cache.unwrap().ttl_seconds, 600);
        assert_eq!(config.rate_limit.unwrap().tokens_per_minute, 100_000);
    }

    #[test]
    fn rejects_duplicate_route_names() {
        let raw = r#"
            [[routes]]
            name = "default"
            match = { use_case = "a" }
            primary = { provider = "openai", model = "gpt-4o-mini" }

            [[routes]]
            name = "default"
            match = { use_case = "b" }
            primary = { provider = "openai", model = "gpt-4o" }
        "#;
        let config: GatewayConfig = toml::from_str(raw).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_retries() {
        let raw = r#"
            [[routes]]
            name = "default"
            match = { use_case = "a" }
            primary = { provider = "openai", model = "gpt-4o-mini" }
            retries = 0
        "#;
        let config: GatewayConfig = toml::from_str(raw).unwrap();
        assert!(config.validate().is_err());
    }
}
