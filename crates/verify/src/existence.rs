//! Remote existence evaluation

use shaproof_types::{CheckName, Identifier, ObjectLookup, SubCheckResult};

pub(crate) const NOT_FOUND: &str = "commit not found in remote history";
pub(crate) const NOT_A_COMMIT: &str = "identifier does not reference a commit";

/// Outcome of the existence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Existence {
    pub result: SubCheckResult,
    /// Full commit hash when the identifier resolved to exactly one commit
    pub resolved: Option<String>,
}

/// Judge a lookup result against the submitted identifier
///
/// A commit whose full hash does not start with the identifier counts as
/// not found, and an abbreviation matching several commits is a failure.
#[must_use]
pub fn check_existence(identifier: &Identifier, lookup: &ObjectLookup) -> Existence {
    let failed = |reason: String| Existence {
        result: SubCheckResult::failed(CheckName::RemoteExistence, reason),
        resolved: None,
    };

    match lookup {
        ObjectLookup::Commit { sha } => {
            let sha = sha.to_ascii_lowercase();
            if sha.starts_with(identifier.normalized()) {
                Existence {
                    result: SubCheckResult::passed(
                        CheckName::RemoteExistence,
                        format!("resolved to commit {sha}"),
                    ),
                    resolved: Some(sha),
                }
            } else {
                failed(NOT_FOUND.to_string())
            }
        }
        ObjectLookup::OtherObject { .. } => failed(NOT_A_COMMIT.to_string()),
        ObjectLookup::NotFound => failed(NOT_FOUND.to_string()),
        ObjectLookup::Ambiguous { matches } => failed(format!(
            "ambiguous abbreviated identifier, {matches} matches"
        )),
    }
}
