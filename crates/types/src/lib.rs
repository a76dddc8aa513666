#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for shaproof
//!
//! This crate provides the data model shared by the verification core, the
//! network adapter and the CLI: identifiers, repository references, typed
//! remote lookup results and the verdict produced by a verification run.
//! Types here are data only; nothing in this crate touches the network.

pub mod identifier;
pub mod lookup;
pub mod repository;
pub mod verdict;

// Re-export commonly used types
pub use identifier::{CharClass, Identifier, FULL_HASH_LEN, MIN_ABBREVIATED_LEN};
pub use lookup::{CommitDetails, FileLookup, ObjectKind, ObjectLookup};
pub use repository::RepositoryRef;
pub use verdict::{CheckName, SubCheckResult, Verdict, VerdictStatus, VerifyStage};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How strictly a submitted identifier is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyMode {
    /// Only a full 40-character commit hash is accepted
    #[default]
    Strict,
    /// Abbreviated hashes are accepted and resolved remotely
    Lenient,
}

impl VerifyMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl fmt::Display for VerifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerifyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" | "partial" => Ok(Self::Lenient),
            other => Err(format!("unknown verification mode: {other}")),
        }
    }
}

// Implement clap::ValueEnum for VerifyMode
impl clap::ValueEnum for VerifyMode {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Strict, Self::Lenient]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Strict => clap::builder::PossibleValue::new("strict"),
            Self::Lenient => clap::builder::PossibleValue::new("lenient"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("LENIENT".parse::<VerifyMode>().unwrap(), VerifyMode::Lenient);
        assert_eq!("partial".parse::<VerifyMode>().unwrap(), VerifyMode::Lenient);
        assert_eq!(" strict ".parse::<VerifyMode>().unwrap(), VerifyMode::Strict);
        assert!("loose".parse::<VerifyMode>().is_err());
    }

    #[test]
    fn mode_defaults_to_strict() {
        assert_eq!(VerifyMode::default(), VerifyMode::Strict);
    }
}
