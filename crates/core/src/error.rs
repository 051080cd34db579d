//! Error types for the trend-signal pipeline.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the trend-signal pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// A required column is missing or holds cells of the wrong shape.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Invalid window or column configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Zero or non-finite value found in genuine input data.
    #[error("Numeric error: {0}")]
    Numeric(String),

    /// Every row was dropped by the finalizer.
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error category, for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or mistyped input column.
    Schema,
    /// Invalid configuration.
    Config,
    /// Zero or non-finite input value.
    Numeric,
    /// No complete rows left after finalizing.
    EmptyResult,
    /// Malformed JSON.
    Json,
}

impl Error {
    /// Create a schema error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Error::Schema(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a numeric error.
    pub fn numeric(msg: impl Into<String>) -> Self {
        Error::Numeric(msg.into())
    }

    /// Create an empty-result error.
    pub fn empty_result(msg: impl Into<String>) -> Self {
        Error::EmptyResult(msg.into())
    }

    /// Get the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Schema(_) => ErrorKind::Schema,
            Error::Config(_) => ErrorKind::Config,
            Error::Numeric(_) => ErrorKind::Numeric,
            Error::EmptyResult(_) => ErrorKind::EmptyResult,
            Error::Json(_) => ErrorKind::Json,
        }
    }

    /// An empty result is an expected outcome for short inputs; the caller
    /// decides whether it counts as a failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::EmptyResult(_))
    }
}
