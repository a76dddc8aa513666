//! Offline format validation

use shaproof_types::{
    CheckName, Identifier, SubCheckResult, VerifyMode, FULL_HASH_LEN, MIN_ABBREVIATED_LEN,
};

/// Check that an identifier has the shape the mode requires
///
/// Strict mode accepts only a full 40-character hexadecimal hash. Lenient
/// mode accepts any hexadecimal prefix between 7 and 40 characters.
#[must_use]
pub fn check_format(identifier: &Identifier, mode: VerifyMode) -> SubCheckResult {
    let value = identifier.normalized();
    let len = value.chars().count();

    if let Some(c) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return SubCheckResult::failed(
            CheckName::Format,
            format!("identifier contains non-hexadecimal character '{c}'"),
        );
    }

    match mode {
        VerifyMode::Strict if len == FULL_HASH_LEN => {
            SubCheckResult::passed(CheckName::Format, "full 40-character commit hash")
        }
        VerifyMode::Strict => SubCheckResult::failed(
            CheckName::Format,
            format!("expected {FULL_HASH_LEN} hex characters, got {len}"),
        ),
        VerifyMode::Lenient if len < MIN_ABBREVIATED_LEN => SubCheckResult::failed(
            CheckName::Format,
            format!("expected at least {MIN_ABBREVIATED_LEN} hex characters, got {len}"),
        ),
        VerifyMode::Lenient if len > FULL_HASH_LEN => SubCheckResult::failed(
            CheckName::Format,
            format!("expected at most {FULL_HASH_LEN} hex characters, got {len}"),
        ),
        VerifyMode::Lenient if len == FULL_HASH_LEN => {
            SubCheckResult::passed(CheckName::Format, "full 40-character commit hash")
        }
        VerifyMode::Lenient => SubCheckResult::passed(
            CheckName::Format,
            format!("abbreviated commit hash of {len} characters"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(value: &str) -> Identifier {
        Identifier::new(value, value)
    }

    #[test]
    fn strict_requires_full_hash() {
        let full = "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678";
        assert!(check_format(&id(full), VerifyMode::Strict).pass);

        let short = check_format(&id("a1b2c3d4e5f6"), VerifyMode::Strict);
        assert!(!short.pass);
        assert_eq!(short.reason, "expected 40 hex characters, got 12");
        assert!(!check_format(&id("a1b2c3d"), VerifyMode::Strict).pass);
    }

    #[test]
    fn lenient_accepts_abbreviations() {
        assert!(check_format(&id("a1b2c3d"), VerifyMode::Lenient).pass);
        assert!(!check_format(&id("a1b2c3"), VerifyMode::Lenient).pass);
        let too_long = "a".repeat(41);
        assert!(!check_format(&id(&too_long), VerifyMode::Lenient).pass);
    }

    #[test]
    fn non_hex_fails_in_both_modes() {
        for mode in [VerifyMode::Strict, VerifyMode::Lenient] {
            let result = check_format(&id("zzzz123"), mode);
            assert!(!result.pass);
            assert_eq!(result.name, CheckName::Format);
            assert!(result.reason.contains("'z'"));
        }
    }

    proptest! {
        #[test]
        fn short_identifiers_always_fail(value in "[0-9a-z]{0,6}") {
            prop_assert!(!check_format(&id(&value), VerifyMode::Strict).pass);
            prop_assert!(!check_format(&id(&value), VerifyMode::Lenient).pass);
        }

        #[test]
        fn full_hex_hashes_pass_strict(value in "[0-9a-f]{40}") {
            prop_assert!(check_format(&id(&value), VerifyMode::Strict).pass);
        }

        #[test]
        fn non_hex_full_length_fails_strict(
            prefix in "[0-9a-f]{0,39}",
            bad in "[g-z]",
        ) {
            let mut value = prefix;
            value.push_str(&bad);
            while value.len() < 40 {
                value.push('0');
            }
            prop_assert!(!check_format(&id(&value), VerifyMode::Strict).pass);
        }

        #[test]
        fn lenient_accepts_hex_prefixes(value in "[0-9a-f]{7,40}") {
            prop_assert!(check_format(&id(&value), VerifyMode::Lenient).pass);
        }
    }
}
