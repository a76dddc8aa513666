#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Commit identifier verification
//!
//! A run normalizes the submitted identifier, validates its format, checks
//! that it names a commit in the target repository, and confirms that the
//! marker file exists at that commit. Each stage produces a `SubCheckResult`;
//! the `Verifier` folds them into a `Verdict`. Optional checks on the answer
//! content and on the commit itself can be enabled per run.
//!
//! Remote access goes through the `RemoteLookup` trait so the core can be
//! driven by the GitHub adapter or by an in-memory fake.

mod answer;
mod details;
mod existence;
mod format;
mod lookup;
mod normalize;
mod orchestrator;
mod presence;

pub use answer::check_answer_content;
pub use details::{check_commit_details, CommitReview};
pub use existence::{check_existence, Existence};
pub use format::check_format;
pub use lookup::RemoteLookup;
pub use normalize::{normalize, parse_identifier};
pub use orchestrator::{Verifier, VerifyOptions, VerifyRequest};
pub use presence::check_presence;
