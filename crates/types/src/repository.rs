//! Hosted repository reference

use serde::{Deserialize, Serialize};
use shaproof_errors::InputError;
use std::fmt;
use std::str::FromStr;

/// Owner and name of a hosted repository, with an optional branch or tag.
///
/// Owner and name are non-empty URL-safe tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    owner: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
}

impl RepositoryRef {
    /// Create a reference to the repository's default branch
    ///
    /// # Errors
    ///
    /// Returns an error if owner or name is empty or contains characters that
    /// are not URL-safe.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, InputError> {
        let owner = owner.into();
        let name = name.into();
        validate_token("owner", &owner)?;
        validate_token("name", &name)?;
        Ok(Self {
            owner,
            name,
            reference: None,
        })
    }

    /// Pin the repository to a branch or tag
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is empty or contains whitespace.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Result<Self, InputError> {
        let reference = reference.into();
        if reference.is_empty() || reference.chars().any(char::is_whitespace) {
            return Err(InputError::InvalidRepository {
                value: format!("{self}@{reference}"),
                reason: "reference must be a non-empty branch or tag name".to_string(),
            });
        }
        self.reference = Some(reference);
        Ok(self)
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Branch or tag, `None` for the provider's default branch
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryRef {
    type Err = InputError;

    /// Accepts `owner/name`, `owner/name@ref`, `https://github.com/owner/name[.git]`
    /// and `https://github.com/owner/name/tree/<ref>`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim();
        let invalid = |reason: &str| InputError::InvalidRepository {
            value: raw.to_string(),
            reason: reason.to_string(),
        };

        let (path, from_url) = match ["https://github.com/", "http://github.com/", "git@github.com:"]
            .iter()
            .find_map(|prefix| s.strip_prefix(prefix))
        {
            Some(rest) => (rest, true),
            None if s.contains("://") => return Err(invalid("only github.com URLs are supported")),
            None => (s, false),
        };

        let (path, mut reference) = match path.rsplit_once('@') {
            Some((p, r)) => (p, Some(r.to_string())),
            None => (path, None),
        };

        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let (owner, name) = match parts.as_slice() {
            [owner, name] => (*owner, *name),
            [owner, name, "tree", rest @ ..] if from_url && !rest.is_empty() => {
                reference = Some(rest.join("/"));
                (*owner, *name)
            }
            [owner, name, ..] if from_url => (*owner, *name),
            _ => return Err(invalid("expected owner/name")),
        };

        let repo = Self::new(owner, name.trim_end_matches(".git"))?;
        match reference {
            Some(r) => repo.with_reference(r),
            None => Ok(repo),
        }
    }
}

fn validate_token(field: &str, value: &str) -> Result<(), InputError> {
    let reason = if value.is_empty() {
        Some(format!("{field} is empty"))
    } else if value == "." || value == ".." {
        Some(format!("{field} cannot be {value:?}"))
    } else if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        Some(format!("{field} contains {c:?}"))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(InputError::InvalidRepository {
            value: value.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
