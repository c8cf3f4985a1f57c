//! Route selection and retry classification
//!
//! Pure in-memory decision logic: maps a use-case to a configured
//! provider/model target and classifies provider failures as retryable
//! or terminal. The dispatch loop that acts on these decisions lives in
//! the server layer.

#![allow(clippy::must_use_candidate)]

mod retry;
mod router;

pub use retry::{is_retryable, status_code_is_retryable};
pub use router::Router;
