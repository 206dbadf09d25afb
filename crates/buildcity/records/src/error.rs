use buildcity_store::StoreError;
use thiserror::Error;

/// Result type for record operations.
pub type RecordsResult<T> = Result<T, RecordsError>;

/// Record-layer errors.
#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("record not found: {0}")]
    NotFound(String),
}
