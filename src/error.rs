use thiserror::Error;

/// Failure taxonomy for a single invocation. Every variant maps onto one HTTP status.
#[derive(Debug, Error)]
pub enum ComparatorError {
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    MethodNotAllowed(String),
    #[error("{0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ComparatorError {
    pub fn status(&self) -> u16 {
        match self {
            ComparatorError::Validation(_) => 400,
            ComparatorError::NotFound(_) => 404,
            ComparatorError::MethodNotAllowed(_) => 405,
            ComparatorError::Config(_)
            | ComparatorError::Upstream(_)
            | ComparatorError::Internal(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ComparatorError::Config(_) => "config",
            ComparatorError::Validation(_) => "validation",
            ComparatorError::NotFound(_) => "not_found",
            ComparatorError::MethodNotAllowed(_) => "method_not_allowed",
            ComparatorError::Upstream(_) => "upstream",
            ComparatorError::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, ComparatorError>;
