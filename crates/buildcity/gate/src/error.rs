use buildcity_store::StoreError;
use thiserror::Error;

/// Errors from gate construction and session plumbing.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("invalid gate configuration: {0}")]
    InvalidConfig(String),

    #[error("gate session is no longer receiving events")]
    SessionClosed,

    #[error("gate cache: {0}")]
    Store(#[from] StoreError),
}
