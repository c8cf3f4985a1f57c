use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::RateLimitError;
use crate::storage::AdmissionStore;

/// In-process counter storage for single-instance deployments
///
/// Mirrors the Redis script's semantics; the mutex serializes
/// in-process callers, but counters are not shared across instances.
#[derive(Debug, Default)]
pub struct MemoryCounters {
    entries: Mutex<HashMap<String, Entry>>,
}

#[derive(Debug)]
struct Entry {
    count: u64,
    expires_at: Instant,
}

impl MemoryCounters {
    /// Create an empty counter store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdmissionStore for MemoryCounters {
    async fn check_and_increment(
        &self,
        key: &str,
        tokens: u64,
        limit: u64,
        ttl_secs: u64,
    ) -> Result<bool, RateLimitError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| RateLimitError::Backend("counter lock poisoned".to_owned()))?;

        let now = Instant::now();
        let current = entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map_or(0, |entry| entry.count);

        if current.saturating_add(tokens) > limit {
            return Ok(false);
        }

        entries.insert(
            key.to_owned(),
            Entry {
                count: current + tokens,
                expires_at: now + Duration::from_secs(ttl_secs),
            },
        );

        Ok(true)
    }
}
