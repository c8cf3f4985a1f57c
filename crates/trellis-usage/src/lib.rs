//! Cost accounting and persistence for gateway requests
//!
//! Every request produces one idempotent usage record (upsert keyed by
//! request id) and zero or more append-only provider attempt rows.
//! Pricing is resolved lazily from the `model_pricing` table and held
//! in a process-wide concurrent cache for the process lifetime.
//!
//! Unlike the cache and rate limiter, this store is fail-visible:
//! write errors are returned to the caller, since accounting
//! correctness matters more than availability here.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
mod pricing;
mod store;

pub use error::UsageError;
pub use pricing::{Pricing, approximate_tokens, estimate_cost};
pub use store::{ProviderAttempt, UsageRecord, UsageStore};
