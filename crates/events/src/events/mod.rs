use serde::{Deserialize, Serialize};

use shaproof_errors::UserFacingError;

/// Structured failure information attached to remote-unavailable events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code such as `network.timeout`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod general;
pub mod verify;

pub use general::*;
pub use verify::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Advisory warnings
    General(GeneralEvent),

    /// Verification run lifecycle
    Verify(VerifyEvent),
}

impl AppEvent {
    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::Warning { .. })
            | Self::Verify(VerifyEvent::RemoteUnavailable { .. }) => Level::WARN,

            Self::Verify(VerifyEvent::StageEntered { .. } | VerifyEvent::CheckCompleted { .. }) => {
                Level::DEBUG
            }

            Self::Verify(VerifyEvent::Started { .. } | VerifyEvent::Completed { .. }) => {
                Level::INFO
            }
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "shaproof::events::general",
            Self::Verify(_) => "shaproof::events::verify",
        }
    }
}
