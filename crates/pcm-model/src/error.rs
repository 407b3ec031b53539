use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid label selector {input:?}: {reason}")]
    InvalidSelector { input: String, reason: String },

    #[error("unknown instance phase: {0}")]
    UnknownPhase(String),

    #[error("invalid policy: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
