//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::Style;
use shaproof_types::{Identifier, SubCheckResult, Verdict, VerdictStatus, VerifyMode};
use std::io;

use crate::error::{EXIT_FAIL, EXIT_PASS, EXIT_TEMPFAIL};

/// Result of a CLI command
#[derive(Debug)]
pub enum CommandOutcome {
    Verdict(Verdict),
    Normalized(Identifier),
    Format {
        identifier: Identifier,
        mode: VerifyMode,
        result: SubCheckResult,
    },
}

impl CommandOutcome {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandOutcome::Verdict(verdict) if verdict.is_inconclusive() => EXIT_TEMPFAIL,
            CommandOutcome::Verdict(verdict) if verdict.pass => EXIT_PASS,
            CommandOutcome::Format { result, .. } if result.pass => EXIT_PASS,
            CommandOutcome::Normalized(_) => EXIT_PASS,
            CommandOutcome::Verdict(_) | CommandOutcome::Format { .. } => EXIT_FAIL,
        }
    }

    fn to_json(&self) -> serde_json::Result<String> {
        match self {
            CommandOutcome::Verdict(verdict) => serde_json::to_string_pretty(verdict),
            CommandOutcome::Normalized(identifier) => serde_json::to_string_pretty(identifier),
            CommandOutcome::Format {
                identifier,
                mode,
                result,
            } => serde_json::to_string_pretty(&serde_json::json!({
                "identifier": identifier.normalized(),
                "mode": mode,
                "check": result,
            })),
        }
    }
}

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    colors: bool,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, colors: bool) -> Self {
        Self {
            json_output,
            colors,
        }
    }

    /// Render command outcome
    pub fn render_result(&self, outcome: &CommandOutcome) -> io::Result<()> {
        if self.json_output {
            let json = outcome.to_json().map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        match outcome {
            CommandOutcome::Verdict(verdict) => self.render_verdict(verdict),
            CommandOutcome::Normalized(identifier) => println!("{}", identifier.normalized()),
            CommandOutcome::Format {
                identifier,
                mode,
                result,
            } => {
                let label = if result.pass {
                    self.style(Style::new().green().bold()).apply_to("VALID")
                } else {
                    self.style(Style::new().red().bold()).apply_to("INVALID")
                };
                println!("{label} {identifier} ({mode}): {}", result.reason);
            }
        }
        Ok(())
    }

    fn render_verdict(&self, verdict: &Verdict) {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Check").add_attribute(Attribute::Bold),
            Cell::new("Result").add_attribute(Attribute::Bold),
            Cell::new("Reason").add_attribute(Attribute::Bold),
        ]);

        for check in &verdict.checks {
            let name = if check.diagnostic {
                format!("{} (diagnostic)", check.name)
            } else {
                check.name.to_string()
            };
            table.add_row(vec![
                Cell::new(name),
                self.result_cell(check),
                Cell::new(&check.reason),
            ]);
        }

        println!(
            "{} in {} ({} mode)",
            verdict.identifier, verdict.repository, verdict.mode
        );
        if let Some(resolved) = &verdict.resolved {
            println!("Resolved commit: {resolved}");
        }
        println!("{table}");

        match verdict.status {
            VerdictStatus::Inconclusive => {
                let reason = verdict
                    .unavailable_reason
                    .as_deref()
                    .unwrap_or("remote unavailable");
                println!(
                    "{} {reason}; retry later",
                    self.style(Style::new().yellow().bold())
                        .apply_to("INCONCLUSIVE")
                );
            }
            VerdictStatus::Completed if verdict.pass => {
                println!("{}", self.style(Style::new().green().bold()).apply_to("PASS"));
            }
            VerdictStatus::Completed => {
                println!("{}", self.style(Style::new().red().bold()).apply_to("FAIL"));
            }
        }
    }

    fn result_cell(&self, check: &SubCheckResult) -> Cell {
        let (text, color) = if check.pass {
            ("pass", Color::Green)
        } else {
            ("fail", Color::Red)
        };
        if self.colors {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn style(&self, style: Style) -> Style {
        if self.colors {
            style
        } else {
            Style::new()
        }
    }
}
