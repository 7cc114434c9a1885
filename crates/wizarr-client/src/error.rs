//! Error types for the Wizarr client.

use thiserror::Error;

/// Result alias used throughout the client crate.
pub type WizarrResult<T> = Result<T, WizarrError>;

/// Errors produced while configuring the client or calling the invitation API.
#[derive(Debug, Error)]
pub enum WizarrError {
    /// Invalid or missing parameters, detected before any request is made.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    /// The API answered 429.
    #[error("Rate limited (429){}", retry_after_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    /// The connection could not be established.
    #[error("Connection failed: {0}")]
    Unreachable(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Any other transport-level failure.
    #[error("Request failed: {0}")]
    Request(String),

    /// The API returned a body that is not a JSON object.
    #[error("Invalid response body: {0}")]
    ParseError(String),

    /// Every attempt for one call hit a retryable error.
    #[error("{message}")]
    MaxRetriesExceeded { attempts: u32, message: String },
}

fn retry_after_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(", retry after {secs}s"),
        None => String::new(),
    }
}

impl WizarrError {
    /// HTTP status carried by this error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WizarrError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WizarrError::Timeout(e.to_string())
        } else if e.is_connect() {
            WizarrError::Unreachable(e.to_string())
        } else if e.is_decode() {
            WizarrError::ParseError(e.to_string())
        } else {
            WizarrError::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for WizarrError {
    fn from(e: serde_json::Error) -> Self {
        WizarrError::ParseError(e.to_string())
    }
}
