//! Error types for the Sullstice Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Sullstice Lambda functions.
#[derive(Error, Debug)]
pub enum Error {
    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream source failure (roster sheet, knowledge documents)
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            _ => 500,
        }
    }
}

/// Failure modes of external data sources (roster sheet, knowledge docs).
///
/// Callers treat every variant as "use the documented default" — an empty
/// roster or an empty document — so the degraded path shows up in the
/// signature instead of hiding behind a catch-all.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Credential or identifier for the source is not configured
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Transport-level failure reaching the source
    #[error("request failed: {0}")]
    Request(String),

    /// Source responded with a non-success status
    #[error("source returned HTTP {0}")]
    Status(u16),

    /// Source payload could not be decoded
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Source responded but held no rows or content
    #[error("source is empty")]
    Empty,
}
