//! Error types for Bucketcast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Validation Errors
    #[error("Invalid event payload: {0}")]
    InvalidEvent(String),

    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    // Transport Errors
    #[error("Failed to publish record at index {index}: {message}")]
    Publish { index: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn missing_field(index: usize, field: &str) -> Self {
        Error::MalformedRecord {
            index,
            reason: format!("missing field `{}`", field),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "ConfigurationError",
            Error::InvalidEvent(_) => "InvalidEvent",
            Error::MalformedRecord { .. } => "MalformedRecordError",
            Error::Publish { .. } => "PublishError",
            Error::Io(_) => "InternalError",
            Error::Other(_) => "InternalError",
        }
    }

    /// Whether re-delivering the same event could succeed.
    ///
    /// Only transport failures qualify; a bad config or a bad record fails
    /// the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Publish { .. } | Error::Io(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidEvent(err.to_string())
    }
}
