//! Unified error type for the analytics pipeline.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the analytics pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The event store rejected a write or read.
    #[error("sink error: {0}")]
    Sink(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Sink(_) => 500,
            Self::Serialization(_) => 400,
            Self::InvalidTimeRange(_) => 400,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
        }
    }
}
