use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use trellis_core::RequestContext;

use crate::error::ProviderError;
use crate::types::{ChatChunk, ChatRequest, ChatResponse};

/// Boxed stream of response chunks
///
/// A well-formed stream yields content deltas and terminates after a
/// chunk carrying a finish reason; transport failures mid-stream
/// surface as `Err` items.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatChunk, ProviderError>> + Send>>;

/// Trait implemented by each LLM provider backend
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Send a non-streaming chat completion request
    async fn chat(&self, request: &ChatRequest, context: &RequestContext) -> Result<ChatResponse, ProviderError>;

    /// Send a streaming chat completion request
    async fn chat_stream(&self, request: &ChatRequest, context: &RequestContext)
    -> Result<ChatStream, ProviderError>;
}
