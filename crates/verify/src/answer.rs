//! Marker file content evaluation

use shaproof_types::{CheckName, SubCheckResult, VerifyMode, MIN_ABBREVIATED_LEN};

use crate::normalize::normalize;

/// Check that the marker file names the verified commit
///
/// The content is normalized like a submitted identifier. Strict mode needs
/// the full hash; lenient mode accepts an abbreviation that prefixes it.
#[must_use]
pub fn check_answer_content(
    content: Option<&str>,
    resolved: &str,
    mode: VerifyMode,
) -> SubCheckResult {
    let Some(content) = content else {
        return SubCheckResult::failed(CheckName::AnswerContent, "marker file content unreadable");
    };

    let Ok(answer) = normalize(content) else {
        return SubCheckResult::failed(
            CheckName::AnswerContent,
            "marker file does not contain a commit identifier",
        );
    };

    let matches = match mode {
        VerifyMode::Strict => answer == resolved,
        VerifyMode::Lenient => {
            answer.len() >= MIN_ABBREVIATED_LEN && resolved.starts_with(answer.as_str())
        }
    };

    if matches {
        SubCheckResult::passed(CheckName::AnswerContent, "marker file names the verified commit")
    } else {
        SubCheckResult::failed(
            CheckName::AnswerContent,
            format!("marker file names {answer}, expected {resolved}"),
        )
    }
}
