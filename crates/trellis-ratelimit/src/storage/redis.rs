use async_trait::async_trait;

use crate::error::RateLimitError;
use crate::storage::AdmissionStore;

/// Atomic check-and-increment, evaluated server-side
///
/// Rejects without mutation when the addition would exceed the limit,
/// otherwise increments and resets the expiry. Returns 1 (admitted) or
/// 0 (rejected). Running as a single script keeps concurrent
/// admissions from racing past the limit.
const ADMIT_SCRIPT: &str = r"
local key = KEYS[1]
local tokens = tonumber(ARGV[1])
local limit = tonumber(ARGV[2])
local ttl = tonumber(ARGV[3])

local current = redis.call('GET', key)
if current and tonumber(current) + tokens > limit then
    return 0
end

redis.call('INCRBY', key, tokens)
redis.call('EXPIRE', key, ttl)
return 1
";

/// Redis-backed counter storage (distributed deployments)
pub struct RedisCounters {
    client: redis::Client,
    script: redis::Script,
}

impl RedisCounters {
    /// Create a Redis-backed counter store
    pub fn new(url: &str) -> Result<Self, RateLimitError> {
        let client =
            redis::Client::open(url).map_err(|e| RateLimitError::Config(format!("invalid redis URL: {e}")))?;

        Ok(Self {
            client,
            script: redis::Script::new(ADMIT_SCRIPT),
        })
    }
}

#[async_trait]
impl AdmissionStore for RedisCounters {
    async fn check_and_increment(
        &self,
        key: &str,
        tokens: u64,
        limit: u64,
        ttl_secs: u64,
    ) -> Result<bool, RateLimitError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| RateLimitError::Backend(format!("connection failed: {e}")))?;

        let admitted: i64 = self
            .script
            .key(key)
            .arg(tokens)
            .arg(limit)
            .arg(ttl_secs)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(format!("admission script failed: {e}")))?;

        Ok(admitted == 1)
    }
}
