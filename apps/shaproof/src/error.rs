//! CLI error handling

use std::fmt;

use shaproof_errors::{Error, UserFacingError};

/// Exit status for a passing verdict
pub const EXIT_PASS: i32 = 0;
/// Exit status for a failing verdict or an unexpected error
pub const EXIT_FAIL: i32 = 1;
/// Exit status for malformed input or configuration
pub const EXIT_USAGE: i32 = 2;
/// Exit status for an inconclusive run (`EX_TEMPFAIL`)
pub const EXIT_TEMPFAIL: i32 = 75;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Error raised by a library crate
    Core(Error),
    /// Invalid command arguments
    InvalidArguments(String),
    /// I/O error
    Io(std::io::Error),
}

impl CliError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(Error::Input(_) | Error::Config(_)) | CliError::InvalidArguments(_) => {
                EXIT_USAGE
            }
            CliError::Core(e) if e.is_remote_unavailable() => EXIT_TEMPFAIL,
            CliError::Core(_) | CliError::Io(_) => EXIT_FAIL,
        }
    }

    /// Structured form used in JSON mode
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CliError::Core(e) => serde_json::json!({
                "error": {
                    "code": e.user_code(),
                    "message": e.user_message(),
                    "hint": e.user_hint(),
                    "retryable": e.is_retryable(),
                }
            }),
            other => serde_json::json!({
                "error": {
                    "code": null,
                    "message": other.to_string(),
                    "hint": null,
                    "retryable": false,
                }
            }),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Core(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Core(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::InvalidArguments(_) => None,
        }
    }
}

impl From<Error> for CliError {
    fn from(e: Error) -> Self {
        CliError::Core(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
