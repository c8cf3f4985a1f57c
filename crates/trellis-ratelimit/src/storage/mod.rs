//! Counter storage backends for admission control

pub mod memory;
pub mod redis;

use async_trait::async_trait;

use crate::error::RateLimitError;

/// Atomic check-and-increment over a namespaced token counter
///
/// Implementations must evaluate and apply the admission decision as
/// one indivisible operation: reject without mutation when adding
/// `tokens` would exceed `limit`, otherwise increment and reset the
/// counter's expiry to `ttl_secs`.
#[async_trait]
pub trait AdmissionStore: Send + Sync {
    /// Returns whether `tokens` were admitted against `key`
    async fn check_and_increment(
        &self,
        key: &str,
        tokens: u64,
        limit: u64,
        ttl_secs: u64,
    ) -> Result<bool, RateLimitError>;
}
