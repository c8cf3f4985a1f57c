use thiserror::Error;

/// Usage accounting errors
#[derive(Debug, Error)]
pub enum UsageError {
    /// Database connection or query error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration file could not be read
    #[error("migration error: {0}")]
    Migration(String),
}
