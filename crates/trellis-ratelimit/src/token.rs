use std::sync::Arc;

use jiff::Zoned;
use trellis_config::RateLimitConfig;

use crate::error::RateLimitError;
use crate::storage::AdmissionStore;
use crate::storage::memory::MemoryCounters;
use crate::storage::redis::RedisCounters;

/// Counter expiry: two bucket widths, so a counter always outlives its
/// minute bucket regardless of clock skew
const COUNTER_TTL_SECS: u64 = 120;

/// Token limiter over per-caller minute buckets
///
/// The limit resets at each minute boundary rather than sliding, so a
/// burst straddling a boundary can momentarily admit up to twice the
/// limit. This is an accepted approximation.
pub struct TokenLimiter {
    store: Option<Arc<dyn AdmissionStore>>,
    limit: u64,
}

impl TokenLimiter {
    /// Create a Redis-backed limiter from configuration
    pub fn new(config: &RateLimitConfig) -> Result<Self, RateLimitError> {
        if config.tokens_per_minute == 0 {
            return Err(RateLimitError::Config("tokens_per_minute must be positive".to_owned()));
        }

        Ok(Self {
            store: Some(Arc::new(RedisCounters::new(config.url.as_str())?)),
            limit: config.tokens_per_minute,
        })
    }

    /// Build a limiter from optional configuration
    ///
    /// Absent or disabled configuration yields the fail-open limiter.
    pub fn from_config(config: Option<&RateLimitConfig>) -> Result<Self, RateLimitError> {
        match config {
            Some(config) if config.enabled => Self::new(config),
            _ => Ok(Self::disabled()),
        }
    }

    /// Create a limiter backed by in-process counters
    ///
    /// For single-instance deployments and tests; distributed
    /// deployments share counters through the Redis backend.
    pub fn in_memory(tokens_per_minute: u64) -> Self {
        Self {
            store: Some(Arc::new(MemoryCounters::new())),
            limit: tokens_per_minute,
        }
    }

    /// Create an unconfigured limiter that admits everything
    ///
    /// Used when rate limiting is disabled: the gateway runs
    /// unthrottled rather than unavailable.
    pub fn disabled() -> Self {
        Self { store: None, limit: 0 }
    }

    /// Decide whether `tokens` may be admitted for `caller` right now
    ///
    /// Returns `Ok(true)` when admitted (counter incremented),
    /// `Ok(false)` when the minute budget is exhausted (no mutation).
    /// Store communication failures surface as `Err`; reacting to them
    /// is the caller's policy.
    pub async fn allow(&self, caller: &str, tokens: u64) -> Result<bool, RateLimitError> {
        let Some(store) = &self.store else {
            return Ok(true);
        };

        let key = bucket_key(caller, &Zoned::now());
        let admitted = store.check_and_increment(&key, tokens, self.limit, COUNTER_TTL_SECS).await?;

        if !admitted {
            tracing::debug!(caller, tokens, limit = self.limit, "token budget exhausted");
        }

        Ok(admitted)
    }
}

/// Derive the counter key for a caller at a point in time
///
/// Truncates the timestamp to minute granularity, so all requests
/// within the same wall-clock minute share one counter.
fn bucket_key(caller: &str, now: &Zoned) -> String {
    format!("rl:tokens:{caller}:{}", now.strftime("%Y%m%d%H%M"))
}
