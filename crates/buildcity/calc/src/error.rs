use thiserror::Error;

pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalcError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },

    #[error("target weight must be less than current weight")]
    TargetNotBelowCurrent,
}
