//! End-to-end request pipeline against the mock provider
//!
//! Exercises the full decision chain for one request: route selection,
//! admission, masking, fingerprinting, dispatch, unmasking, and cost
//! estimation. The rate limiter runs on its in-process backend and the
//! cache in its unconfigured fail-open state, so no external
//! infrastructure is needed.

use trellis_cache::{ResponseCache, generate_key};
use trellis_config::{RouteConfig, RouteMatch, Target};
use trellis_core::RequestContext;
use trellis_governance::Detector;
use trellis_llm::{ChatMessage, ChatRequest, ChatResponse, MockProvider, Provider};
use trellis_ratelimit::TokenLimiter;
use trellis_routing::Router;
use trellis_usage::{Pricing, approximate_tokens, estimate_cost};

fn routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig {
            name: "summaries".to_owned(),
            matcher: RouteMatch {
                use_case: "summarize".to_owned(),
            },
            primary: Target {
                provider: "anthropic".to_owned(),
                model: "claude-3-5-sonnet".to_owned(),
            },
            retries: 2,
        },
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
        },
    ]
}

#[tokio::test]
async fn masked_request_flows_end_to_end() {
    let router = Router::new(routes());
    let limiter = TokenLimiter::in_memory(1000);
    let cache = ResponseCache::disabled();
    let detector = Detector::new();
    let context = RequestContext::new("acme", "summarize", "acme-key-1");

    // Route selection
    let route = router.route(&context.use_case);
    assert_eq!(route.primary.provider, "anthropic");

    // Admission against the in-process counter
    let prompt = "Summarize the email from john.doe@example.com please.";
    let estimated = u64::try_from(approximate_tokens(prompt)).unwrap();
    assert!(limiter.allow(&context.caller, estimated).await.unwrap());

    // Masking: the provider must never see the raw address
    let (masked, unmask_map) = detector.mask(prompt);
    assert!(!masked.contains("john.doe@example.com"));
    assert!(masked.contains("[EMAIL_1]"));

    let request = ChatRequest {
        model: route.primary.model.clone(),
        messages: vec![ChatMessage::user(&masked)],
        stream: false,
    };

    // Cache: fingerprint lookup misses on the disabled cache
    let key = generate_key(&request.model, &request.messages).unwrap();
    let cached: Option<ChatResponse> = cache.get(&key).await.unwrap();
    assert!(cached.is_none());

    // Dispatch
    let provider = MockProvider::new("anthropic");
    let response = provider.chat(&request, &context).await.unwrap();

    // The mock echoes its input, so the echo carries the token, not
    // the original address
    assert!(response.content.contains("[EMAIL_1]"));
    assert!(!response.content.contains("john.doe@example.com"));

    // Caching the response is a no-op but must not fail
    cache.set(&key, &response).await.unwrap();

    // Unmasking restores the original for the caller
    let restored = detector.unmask(&response.content, &unmask_map);
    assert!(restored.contains("john.doe@example.com"));
    assert!(!restored.contains("[EMAIL_1]"));

    // Cost accounting from reported usage
    let usage = response.usage.unwrap();
    let cost = estimate_cost(
        &Pricing::fallback(&request.model),
        usage.prompt_tokens,
        usage.completion_tokens,
    );
    assert!(cost > 0.0);
}

#[tokio::test]
async fn unknown_use_case_falls_back_to_default_route() {
    let router = Router::new(routes());
    let route = router.route("translation");

    assert_eq!(route.name, "default");
    assert_eq!(route.primary.model, "gpt-4o-mini");
}

#[tokio::test]
async fn identical_requests_share_a_fingerprint() {
    let messages = vec![ChatMessage::user("hello")];
    let key_a = generate_key("gpt-4o-mini", &messages).unwrap();
    let key_b = generate_key("gpt-4o-mini", &messages).unwrap();
    assert_eq!(key_a, key_b);

    let other = vec![ChatMessage::user("hello!")];
    assert_ne!(key_a, generate_key("gpt-4o-mini", &other).unwrap());
}
