use std::error::Error;

/// Errors returned when computing progress stats.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("invalid precondition: {0}")]
    InvalidPrecondition(String),

    #[error("review source failed: {0}")]
    Source(#[source] Box<dyn Error + Send + Sync>),
}

impl StatsError {
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub fn from_source(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Source(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
