//! Distributed token admission control
//!
//! Counts admitted tokens per caller per minute bucket. The Redis
//! backend runs the check-and-increment as a single server-side Lua
//! script so that concurrent requests cannot jointly exceed the limit;
//! an in-process backend serves single-instance deployments. An
//! unconfigured limiter admits everything (fail-open).

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
pub mod storage;
mod token;

pub use error::RateLimitError;
pub use token::TokenLimiter;
