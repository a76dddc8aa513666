//! Advisory review of a resolved commit

use shaproof_types::{CheckName, CommitDetails, SubCheckResult};

pub(crate) const NO_MARKDOWN: &str = "commit modifies no Markdown files";

/// Outcome of the commit details review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReview {
    /// Diagnostic result; never affects the verdict
    pub result: SubCheckResult,
    /// One message per concern found
    pub warnings: Vec<String>,
}

/// Review what a commit touched and what its message says
///
/// The commit should modify at least one Markdown file, and its message
/// should mention `entry` and `section` when they are configured. Matching is
/// case-insensitive and by substring.
#[must_use]
pub fn check_commit_details(
    details: &CommitDetails,
    entry: Option<&str>,
    section: Option<&str>,
) -> CommitReview {
    let mut warnings = Vec::new();

    let markdown = details
        .files
        .iter()
        .filter(|path| path.to_ascii_lowercase().ends_with(".md"))
        .count();
    if markdown == 0 {
        warnings.push(NO_MARKDOWN.to_string());
    }

    let message = details.message.to_lowercase();
    for (label, target) in [("entry", entry), ("section", section)] {
        if let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) {
            if !message.contains(&target.to_lowercase()) {
                warnings.push(format!("commit message does not mention {label} '{target}'"));
            }
        }
    }

    let result = if warnings.is_empty() {
        SubCheckResult::passed(
            CheckName::CommitDetails,
            format!("commit modifies {markdown} Markdown file(s)"),
        )
    } else {
        SubCheckResult::failed(CheckName::CommitDetails, warnings.join("; "))
    };

    CommitReview {
        result: result.into_diagnostic(),
        warnings,
    }
}
