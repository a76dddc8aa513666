//! Event handling and progress display

use console::Style;
use shaproof_events::{AppEvent, GeneralEvent, VerifyEvent};

use crate::logging::log_event_with_tracing;

/// Event handler for progress display and user feedback
pub struct EventHandler {
    colors: bool,
    /// Suppress human-readable progress
    json_mode: bool,
    debug: bool,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors: bool, json_mode: bool, debug: bool) -> Self {
        Self {
            colors,
            json_mode,
            debug,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        log_event_with_tracing(&event);

        if self.json_mode {
            return;
        }
        // Per-stage detail is only interesting when debugging
        if !self.debug && event.log_level() > tracing::Level::INFO {
            return;
        }

        match event {
            AppEvent::General(GeneralEvent::Warning { message, context }) => {
                match context {
                    Some(context) => self.show_warning(&format!("{message} ({context})")),
                    None => self.show_warning(&message),
                }
            }
            AppEvent::Verify(VerifyEvent::Started {
                repository,
                identifier,
                mode,
            }) => {
                self.show_status(&format!("Verifying {identifier} in {repository} ({mode})"));
            }
            AppEvent::Verify(VerifyEvent::StageEntered { stage }) => {
                self.show_status(&format!("  stage: {stage}"));
            }
            AppEvent::Verify(VerifyEvent::CheckCompleted {
                check,
                pass,
                reason,
                diagnostic,
            }) => {
                let mark = if pass { "ok" } else { "failed" };
                let suffix = if diagnostic { " (diagnostic)" } else { "" };
                self.show_status(&format!("  {check}{suffix}: {mark}, {reason}"));
            }
            AppEvent::Verify(VerifyEvent::RemoteUnavailable { stage, failure }) => {
                self.show_warning(&format!(
                    "remote unavailable while {stage}: {}",
                    failure.message
                ));
            }
            // The final verdict is rendered by OutputRenderer
            AppEvent::Verify(VerifyEvent::Completed { .. }) => {}
        }
    }

    fn show_status(&self, message: &str) {
        eprintln!("{message}");
    }

    fn show_warning(&self, message: &str) {
        let style = if self.colors {
            Style::new().yellow()
        } else {
            Style::new()
        };
        eprintln!("{} {message}", style.apply_to("warning:"));
    }
}
