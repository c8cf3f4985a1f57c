use trellis_config::{RouteConfig, RouteMatch, Target};

/// Route selection over an ordered, immutable set of route policies
#[derive(Debug)]
pub struct Router {
    routes: Vec<RouteConfig>,
}

impl Router {
    /// Create a router from configured routes, preserving their order
    pub const fn new(routes: Vec<RouteConfig>) -> Self {
        Self { routes }
    }

    /// Select the route for a use-case
    ///
    /// Selection order: first route whose match use-case equals the
    /// input exactly, then the first route named `"default"`, then a
    /// built-in minimal fallback. The function is total; it always
    /// returns a route.
    pub fn route(&self, use_case: &str) -> RouteConfig {
        if let Some(route) = self.routes.iter().find(|r| r.matcher.use_case == use_case) {
            return route.clone();
        }

        if let Some(route) = self.routes.iter().find(|r| r.name == "default") {
            return route.clone();
        }

        tracing::debug!(use_case, "no configured route matched, using built-in fallback");
        builtin_fallback()
    }
}

/// Minimal route used when configuration provides neither a match nor
/// a `"default"` route
fn builtin_fallback() -> RouteConfig {
    RouteConfig {
        name: "default".to_owned(),
        matcher: RouteMatch {
            use_case: String::new(),
        },
        primary: Target {
            provider: "openai".to_owned(),
            model: "gpt-4o-mini".to_owned(),
        },
        retries: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str, use_case: &str, provider: &str, model: &str, retries: u32) -> RouteConfig {
        RouteConfig {
            name: name.to_owned(),
            matcher: RouteMatch {
                use_case: use_case.to_owned(),
            },
            primary: Target {
                provider: provider.to_owned(),
                model: model.to_owned(),
            },
            retries,
        }
    }

    #[test]
    fn exact_use_case_match_wins() {
        let router = Router::new(vec![
            route("default", "", "openai", "gpt-4o-mini", 1),
            route("summaries", "summarize", "anthropic", "claude-3-5-sonnet", 3),
        ]);

        let selected = router.route("summarize");
        assert_eq!(selected.name, "summaries");
        assert_eq!(selected.primary.provider, "anthropic");
        assert_eq!(selected.retries, 3);
    }

    #[test]
    fn first_matching_route_is_selected() {
        let router = Router::new(vec![
            route("a", "chat", "openai", "gpt-4o", 1),
            route("b", "chat", "anthropic", "claude-3-5-sonnet", 1),
        ]);

        assert_eq!(router.route("chat").name, "a");
    }

    #[test]
    fn falls_back_to_configured_default() {
        let router = Router::new(vec![
            route("summaries", "summarize", "anthropic", "claude-3-5-sonnet", 3),
            route("default", "", "openai", "gpt-4o", 2),
        ]);

        let selected = router.route("unknown-use-case");
        assert_eq!(selected.name, "default");
        assert_eq!(selected.primary.model, "gpt-4o");
    }

    #[test]
    fn builtin_fallback_when_nothing_configured() {
        let router = Router::new(vec![route("summaries", "summarize", "anthropic", "claude-3-5-sonnet", 3)]);

        let selected = router.route("unknown-use-case");
        assert_eq!(selected.name, "default");
        assert_eq!(selected.primary.provider, "openai");
        assert_eq!(selected.primary.model, "gpt-4o-mini");
        assert_eq!(selected.retries, 1);
    }

    #[test]
    fn empty_router_is_total() {
        let router = Router::new(Vec::new());
        assert_eq!(router.route("anything").name, "default");
    }
}
