use thiserror::Error;

/// Failure reported by a workload directory backend.
///
/// Always recoverable from the disruptor's point of view: the current cycle is abandoned
/// and the next one starts after the regular interval.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("instance {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("directory request timed out: {0}")]
    Timeout(String),

    #[error("directory rejected request: {0}")]
    Rejected(String),

    #[error("directory unavailable: {0}")]
    Unavailable(String),

    #[error("malformed instance: {0}")]
    Malformed(String),
}

impl DirectoryError {
    pub fn not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
