//! Identifier normalization

use shaproof_errors::InputError;
use shaproof_types::Identifier;

/// Canonicalize a raw identifier
///
/// Trims whitespace, lower-cases, and strips any URL or path prefix so that
/// `https://github.com/o/r/commit/<sha>?diff=split#top` becomes `<sha>`.
/// Normalizing an already-normalized value returns it unchanged.
///
/// # Errors
///
/// Returns `InputError::EmptyIdentifier` if nothing remains after stripping,
/// or `InputError::InvalidCharacter` if the remainder is not alphanumeric.
pub fn normalize(raw: &str) -> Result<String, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyIdentifier);
    }

    let lowered = trimmed.to_lowercase();
    let without_suffix = lowered
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let candidate = without_suffix
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .trim();

    if candidate.is_empty() {
        return Err(InputError::EmptyIdentifier);
    }

    if let Some(offending) = candidate.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return Err(InputError::InvalidCharacter {
            input: trimmed.to_string(),
            offending,
        });
    }

    Ok(candidate.to_string())
}

/// Normalize and wrap in an `Identifier`, keeping the raw input
///
/// # Errors
///
/// See [`normalize`].
pub fn parse_identifier(raw: &str) -> Result<Identifier, InputError> {
    let normalized = normalize(raw)?;
    Ok(Identifier::new(raw, normalized))
}
