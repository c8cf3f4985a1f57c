//! Provider capability consumed by the gateway core
//!
//! A provider is an opaque backend exposing `chat` and `chat_stream`.
//! Real wire-protocol clients live outside this workspace; the only
//! in-repo implementation is [`MockProvider`], the test double used by
//! unit and pipeline tests.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
pub mod mock;
mod provider;
mod types;

pub use error::ProviderError;
pub use mock::MockProvider;
pub use provider::{ChatStream, Provider};
pub use types::{ChatChunk, ChatMessage, ChatRequest, ChatResponse, Role, Usage};
