//! Marker file presence evaluation

use shaproof_types::{CheckName, FileLookup, SubCheckResult};

pub(crate) const ABSENT: &str = "required file absent at reference";

/// Judge whether the marker file was found at `reference`
#[must_use]
pub fn check_presence(marker_file: &str, reference: &str, lookup: &FileLookup) -> SubCheckResult {
    if lookup.is_present() {
        SubCheckResult::passed(
            CheckName::Presence,
            format!("{marker_file} present at {reference}"),
        )
    } else {
        SubCheckResult::failed(CheckName::Presence, ABSENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_and_absent() {
        let found = check_presence(
            "ANSWER.md",
            "main",
            &FileLookup::Present { content: None },
        );
        assert!(found.pass);
        assert_eq!(found.reason, "ANSWER.md present at main");

        let missing = check_presence("ANSWER.md", "main", &FileLookup::Absent);
        assert!(!missing.pass);
        assert_eq!(missing.reason, ABSENT);
    }
}
