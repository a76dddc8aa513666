//! Verification verdict and sub-check results

use crate::VerifyMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of an individual check within a verification run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    Format,
    RemoteExistence,
    Presence,
    AnswerContent,
    CommitDetails,
}

impl CheckName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::RemoteExistence => "remote_existence",
            Self::Presence => "presence",
            Self::AnswerContent => "answer_content",
            Self::CommitDetails => "commit_details",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Result of one check, produced by a checker and consumed by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCheckResult {
    pub name: CheckName,
    pub pass: bool,
    pub reason: String,
    /// Informative only; never contributes to the overall verdict
    #[serde(default, skip_serializing_if = "is_false")]
    pub diagnostic: bool,
}

impl SubCheckResult {
    #[must_use]
    pub fn passed(name: CheckName, reason: impl Into<String>) -> Self {
        Self {
            name,
            pass: true,
            reason: reason.into(),
            diagnostic: false,
        }
    }

    #[must_use]
    pub fn failed(name: CheckName, reason: impl Into<String>) -> Self {
        Self {
            name,
            pass: false,
            reason: reason.into(),
            diagnostic: false,
        }
    }

    /// Mark this result as diagnostic
    #[must_use]
    pub fn into_diagnostic(mut self) -> Self {
        self.diagnostic = true;
        self
    }
}

/// Whether a run reached a definitive answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Completed,
    /// The provider could not answer; retry rather than reject
    Inconclusive,
}

/// Stages of a verification run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyStage {
    Normalizing,
    Validating,
    CheckingRemote,
    CheckingPresence,
    Done,
}

impl fmt::Display for VerifyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normalizing => "normalizing",
            Self::Validating => "validating",
            Self::CheckingRemote => "checking_remote",
            Self::CheckingPresence => "checking_presence",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Final structured outcome of one verification run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub pass: bool,
    pub mode: VerifyMode,
    pub status: VerdictStatus,
    pub checks: Vec<SubCheckResult>,
    /// Repository in `owner/name` form
    pub repository: String,
    /// Normalized identifier that was verified
    pub identifier: String,
    /// Full commit hash the identifier resolved to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inconclusive_stage: Option<VerifyStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,
}

impl Verdict {
    /// Checks that must be present and passing for an overall pass
    pub const REQUIRED_CHECKS: [CheckName; 3] = [
        CheckName::Format,
        CheckName::RemoteExistence,
        CheckName::Presence,
    ];

    /// Build a verdict for a run that reached a definitive answer.
    ///
    /// The overall pass requires every required check to have a non-diagnostic
    /// passing result and no non-diagnostic check to have failed.
    #[must_use]
    pub fn completed(
        mode: VerifyMode,
        repository: impl Into<String>,
        identifier: impl Into<String>,
        resolved: Option<String>,
        checks: Vec<SubCheckResult>,
    ) -> Self {
        let required_passed = Self::REQUIRED_CHECKS.iter().all(|name| {
            checks
                .iter()
                .any(|c| c.name == *name && !c.diagnostic && c.pass)
        });
        let none_failed = checks.iter().filter(|c| !c.diagnostic).all(|c| c.pass);

        Self {
            pass: required_passed && none_failed,
            mode,
            status: VerdictStatus::Completed,
            checks,
            repository: repository.into(),
            identifier: identifier.into(),
            resolved,
            inconclusive_stage: None,
            unavailable_reason: None,
        }
    }

    /// Build a verdict for a run cut short by remote unavailability
    #[must_use]
    pub fn inconclusive(
        mode: VerifyMode,
        repository: impl Into<String>,
        identifier: impl Into<String>,
        checks: Vec<SubCheckResult>,
        stage: VerifyStage,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            pass: false,
            mode,
            status: VerdictStatus::Inconclusive,
            checks,
            repository: repository.into(),
            identifier: identifier.into(),
            resolved: None,
            inconclusive_stage: Some(stage),
            unavailable_reason: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn is_inconclusive(&self) -> bool {
        self.status == VerdictStatus::Inconclusive
    }

    /// First non-diagnostic result recorded for a check
    #[must_use]
    pub fn check(&self, name: CheckName) -> Option<&SubCheckResult> {
        self.checks.iter().find(|c| c.name == name && !c.diagnostic)
    }

    /// Non-diagnostic checks that failed
    pub fn failed_checks(&self) -> impl Iterator<Item = &SubCheckResult> {
        self.checks.iter().filter(|c| !c.diagnostic && !c.pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_passing() -> Vec<SubCheckResult> {
        vec![
            SubCheckResult::passed(CheckName::Format, "ok"),
            SubCheckResult::passed(CheckName::RemoteExistence, "ok"),
            SubCheckResult::passed(CheckName::Presence, "ok"),
        ]
    }

    #[test]
    fn passes_when_required_checks_pass() {
        let verdict = Verdict::completed(VerifyMode::Strict, "acme/repo", "abc", None, all_passing());
        assert!(verdict.pass);
        assert_eq!(verdict.status, VerdictStatus::Completed);
    }

    #[test]
    fn missing_required_check_fails() {
        let checks = vec![SubCheckResult::passed(CheckName::Format, "ok")];
        let verdict = Verdict::completed(VerifyMode::Strict, "acme/repo", "abc", None, checks);
        assert!(!verdict.pass);
    }

    #[test]
    fn diagnostic_pass_never_counts() {
        let checks = vec![
            SubCheckResult::passed(CheckName::Format, "ok"),
            SubCheckResult::failed(CheckName::RemoteExistence, "commit not found in remote history"),
            SubCheckResult::passed(CheckName::Presence, "found").into_diagnostic(),
        ];
        let verdict = Verdict::completed(VerifyMode::Lenient, "acme/repo", "abc", None, checks);
        assert!(!verdict.pass);
        assert!(verdict.check(CheckName::Presence).is_none());
        assert_eq!(verdict.failed_checks().count(), 1);
    }

    #[test]
    fn optional_check_failure_fails_verdict() {
        let mut checks = all_passing();
        checks.push(SubCheckResult::failed(CheckName::AnswerContent, "mismatch"));
        let verdict = Verdict::completed(VerifyMode::Strict, "acme/repo", "abc", None, checks);
        assert!(!verdict.pass);
    }

    #[test]
    fn inconclusive_is_never_a_pass() {
        let verdict = Verdict::inconclusive(
            VerifyMode::Strict,
            "acme/repo",
            "abc",
            all_passing(),
            VerifyStage::CheckingPresence,
            "timeout",
        );
        assert!(!verdict.pass);
        assert!(verdict.is_inconclusive());
    }
}
