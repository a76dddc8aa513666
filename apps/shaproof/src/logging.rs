//! Structured logging integration for events

use shaproof_events::{AppEvent, GeneralEvent, VerifyEvent};
use tracing::{debug, info, warn};

/// Log an `AppEvent` through tracing with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    let domain = event.log_target();

    match event {
        AppEvent::General(GeneralEvent::Warning { message, context }) => {
            warn!(domain, context = ?context, "{message}");
        }
        AppEvent::Verify(verify) => match verify {
            VerifyEvent::Started {
                repository,
                identifier,
                mode,
            } => {
                info!(
                    domain,
                    repository = %repository,
                    identifier = %identifier,
                    mode = %mode,
                    "Verification started"
                );
            }
            VerifyEvent::StageEntered { stage } => {
                debug!(domain, stage = %stage, "Stage entered");
            }
            VerifyEvent::CheckCompleted {
                check,
                pass,
                reason,
                diagnostic,
            } => {
                debug!(
                    domain,
                    check = %check,
                    pass,
                    diagnostic,
                    reason = %reason,
                    "Check completed"
                );
            }
            VerifyEvent::RemoteUnavailable { stage, failure } => {
                warn!(
                    domain,
                    stage = %stage,
                    code = ?failure.code,
                    retryable = failure.retryable,
                    "Remote unavailable: {}",
                    failure.message
                );
            }
            VerifyEvent::Completed { pass, status } => {
                info!(domain, pass, status = ?status, "Verification completed");
            }
        },
    }
}
