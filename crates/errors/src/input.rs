//! Malformed input errors
//!
//! Raised before any remote call is made. Deterministic: the same input always
//! produces the same error.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum InputError {
    #[error("identifier is empty")]
    EmptyIdentifier,

    #[error("identifier {input:?} contains invalid character {offending:?}")]
    InvalidCharacter { input: String, offending: char },

    #[error("invalid repository {value:?}: {reason}")]
    InvalidRepository { value: String, reason: String },
}

impl UserFacingError for InputError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::EmptyIdentifier | Self::InvalidCharacter { .. } => {
                Some("Pass a commit hash such as `a1b2c3d` or a GitHub commit URL.")
            }
            Self::InvalidRepository { .. } => {
                Some("Use the `owner/name` form, optionally followed by `@branch`.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::EmptyIdentifier => "input.empty",
            Self::InvalidCharacter { .. } => "input.invalid_character",
            Self::InvalidRepository { .. } => "input.invalid_repository",
        };
        Some(code)
    }
}
