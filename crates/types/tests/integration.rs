//! Integration tests for types

#[cfg(test)]
mod tests {
    use shaproof_types::*;

    #[test]
    fn test_verdict_serialization_shape() {
        let verdict = Verdict::completed(
            VerifyMode::Strict,
            "acme/repo",
            "zzzz123",
            None,
            vec![SubCheckResult::failed(
                CheckName::Format,
                "identifier contains non-hexadecimal character 'z'",
            )],
        );
        let json = serde_json::to_value(&verdict).unwrap();

        assert_eq!(json["pass"], false);
        assert_eq!(json["mode"], "strict");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["checks"][0]["name"], "format");
        assert_eq!(json["checks"][0]["pass"], false);
        assert!(json["checks"][0].get("diagnostic").is_none());
        assert!(json.get("resolved").is_none());
    }

    #[test]
    fn test_inconclusive_serialization() {
        let verdict = Verdict::inconclusive(
            VerifyMode::Lenient,
            "acme/repo",
            "a1b2c3d4",
            vec![SubCheckResult::passed(CheckName::Format, "ok")],
            VerifyStage::CheckingRemote,
            "connection timeout to acme/repo",
        );
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["status"], "inconclusive");
        assert_eq!(json["inconclusive_stage"], "checking_remote");
    }

    #[test]
    fn test_object_lookup_serialization() {
        let lookup = ObjectLookup::Ambiguous { matches: 2 };
        let json = serde_json::to_string(&lookup).unwrap();
        assert_eq!(json, r#"{"outcome":"ambiguous","matches":2}"#);

        let back: ObjectLookup = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lookup);
    }

    #[test]
    fn test_repository_roundtrip_display() {
        let repo: RepositoryRef = "Acme/Repo".parse().unwrap();
        assert_eq!(repo.to_string(), "Acme/Repo");
        assert_eq!(repo.reference(), None);
    }
}
