//! Verification run state machine

use std::future::Future;
use std::time::Duration;

use shaproof_config::Config;
use shaproof_errors::{Error, NetworkError};
use shaproof_events::{EventEmitter, EventSender, FailureContext, VerifyEvent};
use shaproof_types::{
    CheckName, FileLookup, RepositoryRef, SubCheckResult, Verdict, VerifyMode, VerifyStage,
};

use crate::answer::check_answer_content;
use crate::details::check_commit_details;
use crate::existence::check_existence;
use crate::format::check_format;
use crate::lookup::RemoteLookup;
use crate::normalize::parse_identifier;
use crate::presence::check_presence;

const DIAGNOSTIC_SKIPPED: &str = "diagnostic check skipped: remote unavailable";
const DETAILS_SKIPPED: &str = "commit details skipped: remote unavailable";

/// What to verify
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    pub repository: RepositoryRef,
    /// Raw identifier as submitted
    pub identifier: String,
}

impl VerifyRequest {
    #[must_use]
    pub fn new(repository: RepositoryRef, identifier: impl Into<String>) -> Self {
        Self {
            repository,
            identifier: identifier.into(),
        }
    }
}

/// Per-run policy
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    pub mode: VerifyMode,
    pub marker_file: String,
    pub check_answer_content: bool,
    /// Review the resolved commit's message and changed files
    pub commit_details: bool,
    /// Entry the commit message should mention
    pub target_entry: Option<String>,
    /// Section the commit message should mention
    pub target_section: Option<String>,
    /// Upper bound for each remote call
    pub request_timeout: Duration,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            mode: VerifyMode::Strict,
            marker_file: shaproof_config::constants::DEFAULT_MARKER_FILE.to_string(),
            check_answer_content: false,
            commit_details: false,
            target_entry: None,
            target_section: None,
            request_timeout: Duration::from_secs(shaproof_config::constants::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl VerifyOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            mode: config.general.mode,
            marker_file: config.general.marker_file.clone(),
            check_answer_content: config.general.check_answer_content,
            commit_details: config.general.verify_commit_details,
            target_entry: config.target.entry.clone(),
            target_section: config.target.section.clone(),
            request_timeout: config.request_timeout(),
        }
    }
}

/// Runs verifications against a remote provider
///
/// Holds no per-run state, so one `Verifier` can drive any number of
/// concurrent `verify` calls.
pub struct Verifier<L> {
    lookup: L,
    tx: Option<EventSender>,
}

impl<L> EventEmitter for Verifier<L> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

/// Accumulates results while a run progresses
struct Run<'a> {
    request: &'a VerifyRequest,
    options: &'a VerifyOptions,
    identifier: String,
    checks: Vec<SubCheckResult>,
}

impl<L: RemoteLookup> Verifier<L> {
    #[must_use]
    pub fn new(lookup: L) -> Self {
        Self { lookup, tx: None }
    }

    /// Report progress on `tx`
    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Verify one identifier against one repository
    ///
    /// Validation failures and remote unavailability are part of the
    /// returned `Verdict`; an unreachable provider yields an inconclusive
    /// verdict, never a failed one.
    ///
    /// # Errors
    ///
    /// Returns `Error::Input` if the identifier is empty or contains
    /// characters that cannot belong to a commit hash. No remote call is made
    /// in that case.
    pub async fn verify(
        &self,
        request: &VerifyRequest,
        options: &VerifyOptions,
    ) -> Result<Verdict, Error> {
        self.enter(VerifyStage::Normalizing);
        let identifier = parse_identifier(&request.identifier)?;

        self.emit_verify(VerifyEvent::Started {
            repository: request.repository.to_string(),
            identifier: identifier.normalized().to_string(),
            mode: options.mode,
        });

        let mut run = Run {
            request,
            options,
            identifier: identifier.normalized().to_string(),
            checks: Vec::new(),
        };

        self.enter(VerifyStage::Validating);
        let format = check_format(&identifier, options.mode);
        let format_passed = format.pass;
        self.record(&mut run, format);
        if !format_passed {
            return Ok(self.complete(run, None));
        }

        self.enter(VerifyStage::CheckingRemote);
        let lookup = match Self::bounded(
            options,
            &request.repository,
            self.lookup.resolve_object(&request.repository, &identifier),
        )
        .await
        {
            Ok(lookup) => lookup,
            Err(err) if err.is_remote_unavailable() => {
                return Ok(self.inconclusive(run, VerifyStage::CheckingRemote, &err));
            }
            Err(err) => return Err(err),
        };
        let existence = check_existence(&identifier, &lookup);
        self.record(&mut run, existence.result);

        self.enter(VerifyStage::CheckingPresence);
        match existence.resolved {
            Some(sha) => {
                let file = match self.marker_at(&run, Some(&sha)).await {
                    Ok(file) => file,
                    Err(err) if err.is_remote_unavailable() => {
                        return Ok(self.inconclusive(run, VerifyStage::CheckingPresence, &err));
                    }
                    Err(err) => return Err(err),
                };

                let presence = check_presence(&options.marker_file, &sha, &file);
                let presence_passed = presence.pass;
                self.record(&mut run, presence);

                if options.check_answer_content && presence_passed {
                    let content = match &file {
                        FileLookup::Present { content } => content.as_deref(),
                        FileLookup::Absent => None,
                    };
                    let answer = check_answer_content(content, &sha, options.mode);
                    self.record(&mut run, answer);
                }

                if options.commit_details {
                    self.review_commit(&mut run, &sha).await?;
                }

                Ok(self.complete(run, Some(sha)))
            }
            None => {
                // The commit is unverifiable, so look at the configured branch
                // for information only
                let reference = request.repository.reference();
                let label = reference.unwrap_or("default branch");
                let diagnostic = match self.marker_at(&run, reference).await {
                    Ok(file) => check_presence(&options.marker_file, label, &file),
                    Err(err) if err.is_remote_unavailable() => {
                        self.emit_verify(VerifyEvent::RemoteUnavailable {
                            stage: VerifyStage::CheckingPresence,
                            failure: FailureContext::from_error(&err),
                        });
                        SubCheckResult::failed(CheckName::Presence, DIAGNOSTIC_SKIPPED)
                    }
                    Err(err) => return Err(err),
                };
                self.record(&mut run, diagnostic.into_diagnostic());

                Ok(self.complete(run, None))
            }
        }
    }

    /// Record the advisory commit review; it never changes the outcome
    async fn review_commit(&self, run: &mut Run<'_>, sha: &str) -> Result<(), Error> {
        let repository = &run.request.repository;
        let result = match Self::bounded(
            run.options,
            repository,
            self.lookup.commit_details(repository, sha),
        )
        .await
        {
            Ok(details) => {
                let review = check_commit_details(
                    &details,
                    run.options.target_entry.as_deref(),
                    run.options.target_section.as_deref(),
                );
                for warning in &review.warnings {
                    self.emit_warning_with_context(warning, sha);
                }
                review.result
            }
            Err(err) if err.is_remote_unavailable() => {
                self.emit_verify(VerifyEvent::RemoteUnavailable {
                    stage: VerifyStage::CheckingPresence,
                    failure: FailureContext::from_error(&err),
                });
                SubCheckResult::failed(CheckName::CommitDetails, DETAILS_SKIPPED)
                    .into_diagnostic()
            }
            Err(err) => return Err(err),
        };
        self.record(run, result);
        Ok(())
    }

    async fn marker_at(&self, run: &Run<'_>, reference: Option<&str>) -> Result<FileLookup, Error> {
        let repository = &run.request.repository;
        Self::bounded(
            run.options,
            repository,
            self.lookup
                .file_at(repository, reference, &run.options.marker_file),
        )
        .await
    }

    /// Apply the per-call timeout
    async fn bounded<T>(
        options: &VerifyOptions,
        repository: &RepositoryRef,
        call: impl Future<Output = Result<T, Error>>,
    ) -> Result<T, Error> {
        match tokio::time::timeout(options.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(NetworkError::Timeout {
                url: repository.to_string(),
            }
            .into()),
        }
    }

    fn enter(&self, stage: VerifyStage) {
        self.emit_verify(VerifyEvent::StageEntered { stage });
    }

    fn record(&self, run: &mut Run<'_>, result: SubCheckResult) {
        self.emit_verify(VerifyEvent::CheckCompleted {
            check: result.name,
            pass: result.pass,
            reason: result.reason.clone(),
            diagnostic: result.diagnostic,
        });
        run.checks.push(result);
    }

    fn complete(&self, run: Run<'_>, resolved: Option<String>) -> Verdict {
        self.enter(VerifyStage::Done);
        let verdict = Verdict::completed(
            run.options.mode,
            run.request.repository.to_string(),
            run.identifier,
            resolved,
            run.checks,
        );
        self.emit_verify(VerifyEvent::Completed {
            pass: verdict.pass,
            status: verdict.status,
        });
        verdict
    }

    fn inconclusive(&self, run: Run<'_>, stage: VerifyStage, err: &Error) -> Verdict {
        self.emit_verify(VerifyEvent::RemoteUnavailable {
            stage,
            failure: FailureContext::from_error(err),
        });
        let verdict = Verdict::inconclusive(
            run.options.mode,
            run.request.repository.to_string(),
            run.identifier,
            run.checks,
            stage,
            err.to_string(),
        );
        self.emit_verify(VerifyEvent::Completed {
            pass: verdict.pass,
            status: verdict.status,
        });
        verdict
    }
}
