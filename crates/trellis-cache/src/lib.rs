//! Content-addressed response cache backed by Redis
//!
//! Responses are keyed by a SHA-256 fingerprint of (model, message
//! sequence), making the cache exact-match only: textually different
//! prompts are distinct entries even when semantically equivalent.
//! Entries expire passively via TTL; there is no explicit invalidation.
//! An unconfigured cache always misses (fail-open: the gateway degrades
//! to always-compute rather than failing).

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use thiserror::Error;
use trellis_config::CacheConfig;

/// Cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// Redis connection or command error
    #[error("cache backend: {0}")]
    Backend(String),
    /// Value could not be serialized for storage
    #[error("serialization: {0}")]
    Serialization(String),
    /// Stored payload exists but failed to deserialize
    ///
    /// Distinct from a miss: this is a data-corruption signal.
    #[error("corrupt cache entry: {0}")]
    Corrupt(String),
}

/// Redis-backed response cache
#[derive(Clone)]
pub struct ResponseCache {
    client: Option<redis::Client>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis URL is invalid
    pub fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| CacheError::Backend(format!("invalid URL: {e}")))?;

        Ok(Self {
            client: Some(client),
            ttl: Duration::from_secs(config.ttl_seconds),
        })
    }

    /// Create an unconfigured cache
    ///
    /// Every `get` misses and every `set` is a no-op.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            client: None,
            ttl: Duration::ZERO,
        }
    }

    /// Build a cache from optional configuration
    ///
    /// Absent or disabled configuration yields the fail-open cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured Redis URL is invalid
    pub fn from_config(config: Option<&CacheConfig>) -> Result<Self, CacheError> {
        match config {
            Some(config) if config.enabled => Self::new(config),
            _ => Ok(Self::disabled()),
        }
    }

    /// Look up a cached value by fingerprint
    ///
    /// A miss is `Ok(None)`, never an error. A hit that fails to
    /// deserialize returns [`CacheError::Corrupt`].
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure or a corrupt entry
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        use redis::AsyncCommands;

        let Some(client) = &self.client else {
            return Ok(None);
        };

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(format!("connection failed: {e}")))?;

        let namespaced = format!("cache:{key}");
        let result: Option<String> = conn
            .get(&namespaced)
            .await
            .map_err(|e| CacheError::Backend(format!("GET failed: {e}")))?;

        let Some(data) = result else {
            tracing::debug!(key, "cache miss");
            return Ok(None);
        };

        let value = decode(&data)?;
        tracing::debug!(key, "cache hit");
        Ok(Some(value))
    }

    /// Store a value under a fingerprint with the TTL fixed at
    /// construction time
    ///
    /// Silent no-op when the cache is unconfigured. Concurrent writers
    /// to the same fingerprint race harmlessly to the same value.
    ///
    /// # Errors
    ///
    /// Returns an error on connection or serialization failure
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        use redis::AsyncCommands;

        let Some(client) = &self.client else {
            return Ok(());
        };

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(format!("connection failed: {e}")))?;

        let namespaced = format!("cache:{key}");
        let data = serde_json::to_string(value).map_err(|e| CacheError::Serialization(format!("serialize: {e}")))?;

        let _: () = conn
            .set_ex(&namespaced, &data, self.ttl.as_secs())
            .await
            .map_err(|e| CacheError::Backend(format!("SET failed: {e}")))?;

        tracing::debug!(key, ttl_secs = self.ttl.as_secs(), "cached response");
        Ok(())
    }
}

/// Decode a stored payload, flagging malformed data as corruption
///
/// A payload that exists but does not parse is [`CacheError::Corrupt`],
/// never silently treated as a miss.
fn decode<T: DeserializeOwned>(data: &str) -> Result<T, CacheError> {
    serde_json::from_str(data).map_err(|e| CacheError::Corrupt(format!("deserialize: {e}")))
}

/// Compute the request fingerprint for (model, messages)
///
/// SHA-256 over the model identifier followed by the canonical JSON of
/// the message sequence, as lowercase hex. Deterministic: identical
/// input always yields the same fingerprint.
///
/// # Errors
///
/// Returns an error if the messages fail to serialize
pub fn generate_key<T: Serialize>(model: &str, messages: &T) -> Result<String, CacheError> {
    let data = serde_json::to_vec(messages).map_err(|e| CacheError::Serialization(format!("serialize: {e}")))?;

    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update(&data);
    Ok(format!("{:x}", hasher.finalize()))
}
