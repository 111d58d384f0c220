//! api::errors
//!
//! Error types for the authenticated API client.
//!
//! # Security
//!
//! Error messages never include token values. Response bodies are included
//! for ordinary HTTP failures because the server reports validation problems
//! there.

use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient) requests.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Non-success response. Also returned when the single retry after a
    /// refresh fails, including with another 401.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The session ended: there was no refresh token, or the refresh failed.
    /// Observers have been told via `on_unauthorized`.
    #[error("not authorized; log in again")]
    Unauthorized,

    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// A success response whose body is not the expected JSON.
    #[error("cannot decode response: {0}")]
    Decode(String),

    /// A header value (usually the bearer token) is not valid in HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

impl ApiError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the session was ended by this failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest includes the URL, never headers.
        Self::Network(err.to_string())
    }
}

/// Why a refresh attempt failed. Cloned to every caller sharing the attempt.
#[derive(Debug, Clone, Error)]
pub enum RefreshFailure {
    #[error("refresh rejected with HTTP {0}")]
    Rejected(u16),

    #[error("refresh request failed: {0}")]
    Network(String),

    #[error("refresh response invalid: {0}")]
    Decode(String),
}
