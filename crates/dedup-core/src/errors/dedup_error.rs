use super::{ConsolidationError, OracleError, StorageError};

/// Top-level error for the pipeline. Subsystem errors fold in via `From`.
#[derive(Debug, thiserror::Error)]
pub enum DedupError {
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("oracle error: {0}")]
    OracleError(#[from] OracleError),

    #[error("consolidation error: {0}")]
    ConsolidationError(#[from] ConsolidationError),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type DedupResult<T> = Result<T, DedupError>;
