#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for shaproof
//!
//! Errors are grouped by domain. Only conditions that abort a verification run
//! live here: malformed input, remote unavailability and configuration
//! problems. Expected validation outcomes (a malformed hash, a missing commit,
//! an absent marker file) are data carried in `SubCheckResult`, never errors.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod input;
pub mod network;

pub use config::ConfigError;
pub use input::InputError;
pub use network::NetworkError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("malformed input: {0}")]
    Input(#[from] InputError),

    #[error("remote unavailable: {0}")]
    Network(#[from] NetworkError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether this error means the hosting provider could not give an answer.
    ///
    /// Such errors turn a verification run inconclusive instead of failing it.
    /// A malformed API URL is a local mistake and never counts.
    #[must_use]
    pub fn is_remote_unavailable(&self) -> bool {
        matches!(self, Self::Network(err) if !matches!(err, NetworkError::InvalidUrl(_)))
    }
}

/// Result type alias for shaproof operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Input(err) => err.user_message(),
            Error::Network(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Input(err) => err.user_hint(),
            Error::Network(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Network(err) => err.is_retryable(),
            Error::Input(_) | Error::Config(_) => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Input(err) => err.user_code(),
            Error::Network(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
        }
    }
}
