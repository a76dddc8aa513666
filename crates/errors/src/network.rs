//! Network-related error types
//!
//! Every variant means the hosting provider could not be asked or could not
//! answer. None of them is evidence that a commit or file is missing.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum NetworkError {
    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("repository {repository} is private or does not exist")]
    RepositoryUnavailable { repository: String },

    #[error("unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },

    #[error("rate limited: retry after {seconds} seconds")]
    RateLimited { seconds: u64 },
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } | Self::ConnectionRefused(_) | Self::RequestFailed(_) => {
                Some("Check network connectivity to the hosting provider and retry.")
            }
            Self::RateLimited { .. } => {
                Some("Wait for the rate limit window to reset or set GITHUB_TOKEN.")
            }
            Self::RepositoryUnavailable { .. } => {
                Some("Check the repository name and that the token can read it.")
            }
            Self::InvalidUrl(_) => Some("Fix the configured API URL."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidUrl(_))
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Timeout { .. } => "network.timeout",
            Self::RequestFailed(_) => "network.request_failed",
            Self::ConnectionRefused(_) => "network.connection_refused",
            Self::InvalidUrl(_) => "network.invalid_url",
            Self::HttpError { .. } => "network.http_error",
            Self::RepositoryUnavailable { .. } => "network.repository_unavailable",
            Self::UnexpectedResponse { .. } => "network.unexpected_response",
            Self::RateLimited { .. } => "network.rate_limited",
        };
        Some(code)
    }
}
