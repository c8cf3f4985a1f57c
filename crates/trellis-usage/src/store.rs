use std::path::Path;

use dashmap::DashMap;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use trellis_config::UsageConfig;

use crate::error::UsageError;
use crate::pricing::{Pricing, estimate_cost};

/// One logged request outcome
#[derive(Debug, Clone, Default)]
pub struct UsageRecord {
    /// Globally unique request id; re-logging the same id overwrites
    /// prior fields rather than duplicating rows
    pub request_id: String,
    /// Tenant the request belongs to
    pub tenant: String,
    /// Use-case label the request was routed by
    pub use_case: String,
    /// Name of the selected route
    pub route_name: String,
    /// Provider that ultimately served the request
    pub provider: String,
    /// Model that ultimately served the request
    pub model: String,
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Sum of prompt and completion tokens
    pub total_tokens: u32,
    /// End-to-end latency in milliseconds
    pub latency_ms: u64,
    /// Final HTTP status returned to the caller
    pub status_code: u16,
    /// Error message, empty on success
    pub error_message: String,
}

/// One retry attempt against a provider for a given request
#[derive(Debug, Clone)]
pub struct ProviderAttempt {
    /// 1-based attempt ordinal
    pub attempt_no: u32,
    /// Provider tried in this attempt
    pub provider: String,
    /// Model tried in this attempt
    pub model: String,
    /// Attempt latency in milliseconds
    pub latency_ms: u64,
    /// Status code observed, 0 when the call never completed
    pub status_code: u16,
    /// Error message, empty on success
    pub error_message: String,
}

const UPSERT_REQUEST_SQL: &str = "
    INSERT INTO requests (request_id, tenant, use_case, route_name, provider, model,
                          prompt_tokens, completion_tokens, total_tokens,
                          cost_estimate_usd, latency_ms, status_code, error_message)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
    ON CONFLICT (request_id) DO UPDATE SET
        tenant = EXCLUDED.tenant,
        use_case = EXCLUDED.use_case,
        route_name = EXCLUDED.route_name,
        provider = EXCLUDED.provider,
        model = EXCLUDED.model,
        prompt_tokens = EXCLUDED.prompt_tokens,
        completion_tokens = EXCLUDED.completion_tokens,
        total_tokens = EXCLUDED.total_tokens,
        cost_estimate_usd = EXCLUDED.cost_estimate_usd,
        latency_ms = EXCLUDED.latency_ms,
        status_code = EXCLUDED.status_code,
        error_message = EXCLUDED.error_message
";

/// Resolves the internal id of the matching request row; inserts
/// nothing when no such row exists yet.
const INSERT_ATTEMPT_SQL: &str = "
    INSERT INTO provider_attempts (request_id, attempt_no, provider, model,
                                   latency_ms, status_code, error_message)
    SELECT id, $2, $3, $4, $5, $6, $7 FROM requests WHERE request_id = $1 LIMIT 1
";

const SELECT_PRICING_SQL: &str = "
    SELECT model, input_rate_1m, output_rate_1m
    FROM model_pricing
    WHERE model = $1
";

/// Postgres-backed usage store with a process-wide pricing cache
pub struct UsageStore {
    pool: PgPool,
    /// Lazily filled, never invalidated; pricing changes require a
    /// process restart. Concurrent redundant fills are harmless
    /// (last-writer-wins over identical values).
    pricing_cache: DashMap<String, Pricing>,
}

impl UsageStore {
    /// Connect to the database and create a store with an empty
    /// pricing cache
    pub async fn connect(config: &UsageConfig) -> Result<Self, UsageError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;

        Ok(Self::with_pool(pool))
    }

    /// Build a store around an existing pool
    ///
    /// Each store owns a fresh pricing cache, which lets tests reset
    /// pricing state between cases.
    pub fn with_pool(pool: PgPool) -> Self {
        Self {
            pool,
            pricing_cache: DashMap::new(),
        }
    }

    /// Record one request outcome, idempotently
    ///
    /// Computes the cost estimate from resolved pricing and upserts on
    /// request id: retried logging calls converge instead of
    /// duplicating rows.
    pub async fn log(&self, record: &UsageRecord) -> Result<(), UsageError> {
        let pricing = self.pricing_for(&record.model).await;
        let cost = estimate_cost(&pricing, record.prompt_tokens, record.completion_tokens);

        sqlx::query(UPSERT_REQUEST_SQL)
            .bind(&record.request_id)
            .bind(&record.tenant)
            .bind(&record.use_case)
            .bind(&record.route_name)
            .bind(&record.provider)
            .bind(&record.model)
            .bind(i64::from(record.prompt_tokens))
            .bind(i64::from(record.completion_tokens))
            .bind(i64::from(record.total_tokens))
            .bind(cost)
            .bind(i64::try_from(record.latency_ms).unwrap_or(i64::MAX))
            .bind(i32::from(record.status_code))
            .bind(&record.error_message)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Append one provider attempt for a previously logged request
    ///
    /// Silently affects zero rows when the request row does not exist
    /// yet; calling `log` first is the caller's responsibility.
    pub async fn log_attempt(&self, request_id: &str, attempt: &ProviderAttempt) -> Result<(), UsageError> {
        sqlx::query(INSERT_ATTEMPT_SQL)
            .bind(request_id)
            .bind(i64::from(attempt.attempt_no))
            .bind(&attempt.provider)
            .bind(&attempt.model)
            .bind(i64::try_from(attempt.latency_ms).unwrap_or(i64::MAX))
            .bind(i32::from(attempt.status_code))
            .bind(&attempt.error_message)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Resolve pricing for a model
    ///
    /// Checks the in-process cache, then the `model_pricing` table.
    /// Query failures (including a missing row) fall back to default
    /// rates without caching them, so a later successful lookup can
    /// still land.
    async fn pricing_for(&self, model: &str) -> Pricing {
        if let Some(hit) = self.pricing_cache.get(model) {
            return hit.clone();
        }

        match sqlx::query_as::<_, Pricing>(SELECT_PRICING_SQL)
            .bind(model)
            .fetch_one(&self.pool)
            .await
        {
            Ok(pricing) => {
                self.pricing_cache.insert(model.to_owned(), pricing.clone());
                pricing
            }
            Err(e) => {
                tracing::warn!(model, error = %e, "pricing lookup failed, using fallback rates");
                Pricing::fallback(model)
            }
        }
    }

    /// Execute one SQL migration file verbatim
    ///
    /// A straight file-to-exec pass-through; ordering and tracking of
    /// applied migrations is up to the operator.
    pub async fn migrate(&self, path: &Path) -> Result<(), UsageError> {
        let sql = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| UsageError::Migration(format!("failed to read {}: {e}", path.display())))?;

        sqlx::raw_sql(&sql).execute(&self.pool).await?;
        Ok(())
    }
}
