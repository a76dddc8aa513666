//! Typed results of remote lookups
//!
//! Provider responses are decoded into these variants at the network boundary
//! so the verification core never inspects raw response bodies. Transport
//! failures are carried on the `Err` side of the surrounding `Result`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Git object kinds other than commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Tree,
    Blob,
    Tag,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree => write!(f, "tree"),
            Self::Blob => write!(f, "blob"),
            Self::Tag => write!(f, "tag"),
        }
    }
}

/// Outcome of resolving an identifier against a repository's object database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ObjectLookup {
    /// Resolved to a commit; `sha` is the full hash
    Commit { sha: String },
    /// Resolved to an object that is not a commit
    OtherObject { kind: ObjectKind, sha: String },
    /// No object matches the identifier
    NotFound,
    /// An abbreviation matched several commits
    Ambiguous { matches: usize },
}

/// Metadata of a resolved commit used by the commit details diagnostic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub sha: String,
    /// Full commit message
    pub message: String,
    /// Paths of the files the commit touched
    pub files: Vec<String>,
}

/// Outcome of looking up a file path at a reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileLookup {
    /// The path is a file; content is absent for non-text entries such as symlinks
    Present { content: Option<String> },
    Absent,
}

impl FileLookup {
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }
}
