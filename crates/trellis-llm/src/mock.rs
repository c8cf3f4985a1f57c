//! Mock provider returning canned responses
//!
//! The only provider implementation in this workspace. Echoes the last
//! user message so tests can assert that masked content, not the
//! original, reached the provider. Can be configured to fail the first
//! `n` calls with a 503 to drive retry and failover tests.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use futures_util::stream;
use trellis_core::RequestContext;

use crate::error::ProviderError;
use crate::provider::{ChatStream, Provider};
use crate::types::{ChatChunk, ChatRequest, ChatResponse, Role, Usage};

/// Canned usage reported on every successful mock response
const MOCK_USAGE: Usage = Usage {
    prompt_tokens: 15,
    completion_tokens: 25,
    total_tokens: 40,
};

/// Test-double provider
pub struct MockProvider {
    name: String,
    /// Remaining calls to fail before succeeding
    fail_remaining: AtomicU32,
    /// Total chat calls received
    call_count: AtomicU32,
}

impl MockProvider {
    /// Create a mock that always succeeds
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fail_remaining: AtomicU32::new(0),
            call_count: AtomicU32::new(0),
        }
    }

    /// Create a mock that fails its first `n` calls with a 503
    pub fn failing(name: impl Into<String>, n: u32) -> Self {
        Self {
            name: name.into(),
            fail_remaining: AtomicU32::new(n),
            call_count: AtomicU32::new(0),
        }
    }

    /// Number of chat calls received so far
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    fn check_failure(&self) -> Result<(), ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        let failed = self
            .fail_remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();

        if failed {
            return Err(ProviderError::Upstream {
                status: 503,
                message: "mock upstream unavailable".to_owned(),
            });
        }
        Ok(())
    }

    fn echo_content(&self, request: &ChatRequest) -> String {
        let last_user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map_or("", |m| m.content.as_str());

        format!("{} mock: {last_user}", self.name)
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(&self, request: &ChatRequest, _context: &RequestContext) -> Result<ChatResponse, ProviderError> {
        self.check_failure()?;

        Ok(ChatResponse {
            id: format!("mock-{}-id", self.name),
            model: request.model.clone(),
            content: self.echo_content(request),
            finish_reason: "stop".to_owned(),
            usage: Some(MOCK_USAGE),
        })
    }

    async fn chat_stream(
        &self,
        request: &ChatRequest,
        _context: &RequestContext,
    ) -> Result<ChatStream, ProviderError> {
        self.check_failure()?;

        let id = format!("mock-{}-stream-id", self.name);
        let model = request.model.clone();
        let content = self.echo_content(request);

        let words: Vec<String> = content.split(' ').map(ToOwned::to_owned).collect();
        let last = words.len().saturating_sub(1);

        let chunks: Vec<Result<ChatChunk, ProviderError>> = words
            .into_iter()
            .enumerate()
            .map(|(i, word)| {
                let delta = if i == 0 { word } else { format!(" {word}") };
                Ok(ChatChunk {
                    id: id.clone(),
                    model: model.clone(),
                    delta,
                    finish_reason: (i == last).then(|| "stop".to_owned()),
                })
            })
            .collect();

        Ok(Box::pin(stream::iter(chunks)))
    }
}
