use serde::{Deserialize, Serialize};
use shaproof_types::{CheckName, VerdictStatus, VerifyMode, VerifyStage};

use super::FailureContext;

/// Lifecycle of a single verification run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VerifyEvent {
    Started {
        repository: String,
        identifier: String,
        mode: VerifyMode,
    },

    /// The run moved to a new stage
    StageEntered { stage: VerifyStage },

    CheckCompleted {
        check: CheckName,
        pass: bool,
        reason: String,
        diagnostic: bool,
    },

    /// The provider could not answer; the run ends inconclusive unless the
    /// stage was diagnostic
    RemoteUnavailable {
        stage: VerifyStage,
        failure: FailureContext,
    },

    Completed { pass: bool, status: VerdictStatus },
}
