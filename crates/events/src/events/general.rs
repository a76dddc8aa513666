use serde::{Deserialize, Serialize};

/// Events that are not tied to a single verification stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    /// Advisory finding that never changes the verdict
    Warning {
        message: String,
        /// What the warning is about, such as a commit hash
        context: Option<String>,
    },
}

impl GeneralEvent {
    /// Create a warning event with context
    pub fn warning_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
            context: Some(context.into()),
        }
    }
}
