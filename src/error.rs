use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlRowsError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    /// Failure reported by a third-party driver adapter, passed through unchanged.
    #[error(transparent)]
    Driver(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Statement produced no result columns: {0}")]
    NoResultColumns(String),

    #[error("Result set has a single unnamed column; rows are bare values, not mappings")]
    NoFields,

    #[error(transparent)]
    SerializationError(#[from] serde_json::Error),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}
