//! Error types for the AutoML dataset client

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest_middleware::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication or permission failure (401/403)
    #[error("Authentication failed (status {status}): {message}")]
    Auth { status: u16, message: String },

    /// The addressed resource does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Quota or rate limit exceeded
    #[error("Rate limit exceeded (retry after {retry_after:?}): {message}")]
    RateLimit {
        message: String,
        /// How long the service asked us to wait
        retry_after: Option<Duration>,
    },

    /// Server error (5xx status codes)
    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    /// Client error (4xx status codes other than the ones above)
    #[error("Client error (status {status}): {message}")]
    Client { status: u16, message: String },

    /// A long-running operation finished with an error status
    #[error("Operation {name} failed (code {code}): {message}")]
    Operation {
        name: String,
        code: i32,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(reqwest_middleware::Error::Reqwest(err))
    }
}

impl Error {
    /// Check if the error is transient
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::RateLimit { .. } => true,
            Error::Server { .. } => true,
            Error::Auth { .. } => false,
            Error::NotFound { .. } => false,
            Error::Client { .. } => false,
            Error::Operation { .. } => false,
            Error::Validation(_) => false,
            Error::Serialization(_) => false,
            Error::Io(_) => false,
            Error::Configuration(_) => false,
        }
    }

    /// HTTP status of the failed call, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. }
            | Error::Server { status, .. }
            | Error::Client { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(404),
            Error::RateLimit { .. } => Some(429),
            _ => None,
        }
    }
}

/// Google API error envelope: `{"error": {"code": .., "message": .., "status": ..}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Pull a human-readable message out of an error response body.
///
/// Falls back to the raw body when it is not a Google error envelope.
pub(crate) fn error_message(body: &str, fallback: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) if !status.is_empty() => {
                format!("{} ({})", envelope.error.message, status)
            }
            _ => envelope.error.message,
        },
        Err(_) if body.trim().is_empty() => fallback.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Turn a non-success response into an [`Error`]
pub(crate) async fn map_response_error(response: reqwest::Response) -> Error {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after);

    let body = response.text().await.unwrap_or_default();
    let fallback = format!("Unexpected status: {}", status);
    let message = error_message(&body, &fallback);

    tracing::warn!(status = status.as_u16(), %message, "AutoML API returned an error");

    classify(status.as_u16(), message, retry_after)
}

/// Parse a `Retry-After` value, either delta-seconds or an HTTP date.
///
/// A date in the past yields a zero wait.
fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?;
    let wait = date.with_timezone(&Utc) - Utc::now();
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}

fn classify(status: u16, message: String, retry_after: Option<Duration>) -> Error {
    match status {
        401 | 403 => Error::Auth { status, message },
        404 => Error::NotFound { message },
        429 => Error::RateLimit {
            message,
            retry_after,
        },
        500..=599 => Error::Server { status, message },
        _ => Error::Client { status, message },
    }
}
