//! Integration tests for net crate

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;
    use shaproof_errors::{Error, NetworkError};
    use shaproof_net::*;
    use shaproof_types::{FileLookup, Identifier, ObjectKind, ObjectLookup, RepositoryRef};
    use std::time::Duration;

    const FULL_SHA: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678";

    fn github(server: &MockServer) -> GitHubClient {
        GitHubClient::new(NetClient::with_defaults().unwrap(), &server.base_url()).unwrap()
    }

    fn repo() -> RepositoryRef {
        RepositoryRef::new("acme", "repo").unwrap()
    }

    fn id(value: &str) -> Identifier {
        Identifier::new(value, value)
    }

    #[tokio::test]
    async fn test_full_hash_resolves_commit_with_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/repos/acme/repo/commits/{FULL_SHA}"))
                    .header("authorization", "Bearer secret")
                    .header("accept", "application/vnd.github+json")
                    .header("x-github-api-version", "2022-11-28");
                then.status(200).json_body(json!({ "sha": FULL_SHA }));
            })
            .await;

        let client = github(&server).with_token("secret").unwrap();
        let lookup = client.lookup_object(&repo(), &id(FULL_SHA)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            lookup,
            ObjectLookup::Commit {
                sha: FULL_SHA.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_non_commit_hash_reports_object_kind() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/repos/acme/repo/commits/{FULL_SHA}"));
                then.status(422)
                    .json_body(json!({ "message": "No commit found for SHA" }));
            })
            .await;
        // trees is left unmocked and answers 404
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/repos/acme/repo/git/blobs/{FULL_SHA}"));
                then.status(200).json_body(json!({ "sha": FULL_SHA }));
            })
            .await;

        let lookup = github(&server)
            .lookup_object(&repo(), &id(FULL_SHA))
            .await
            .unwrap();
        assert_eq!(
            lookup,
            ObjectLookup::OtherObject {
                kind: ObjectKind::Blob,
                sha: FULL_SHA.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_hash_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/repos/acme/repo/commits/{FULL_SHA}"));
                then.status(422);
            })
            .await;

        let lookup = github(&server)
            .lookup_object(&repo(), &id(FULL_SHA))
            .await
            .unwrap();
        assert_eq!(lookup, ObjectLookup::NotFound);
    }

    #[tokio::test]
    async fn test_missing_repository_is_unavailable() {
        let server = MockServer::start_async().await;

        let err = github(&server)
            .lookup_object(&repo(), &id(FULL_SHA))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::RepositoryUnavailable { .. })
        ));
        assert!(err.is_remote_unavailable());
    }

    #[tokio::test]
    async fn test_commit_404_in_readable_repository_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/repo");
                then.status(200).json_body(json!({ "full_name": "acme/repo" }));
            })
            .await;

        let lookup = github(&server)
            .lookup_object(&repo(), &id(FULL_SHA))
            .await
            .unwrap();
        assert_eq!(lookup, ObjectLookup::NotFound);
    }

    #[tokio::test]
    async fn test_abbreviation_resolves_without_search() {
        let server = MockServer::start_async().await;
        let commit = server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/repo/commits/a1b2c3d4");
                then.status(200).json_body(json!({ "sha": FULL_SHA }));
            })
            .await;
        // Search has not indexed the commit, e.g. it only lives on a feature branch
        let search = server
            .mock_async(|when, then| {
                when.method(GET).path("/search/commits");
                then.status(200).json_body(json!({ "total_count": 0, "items": [] }));
            })
            .await;

        let client = github(&server);
        let pinned = repo().with_reference("feature").unwrap();
        let abbreviated = client
            .lookup_object(&pinned, &id("a1b2c3d4"))
            .await
            .unwrap();

        commit.assert_async().await;
        assert_eq!(search.hits_async().await, 0);
        assert_eq!(
            abbreviated,
            ObjectLookup::Commit {
                sha: FULL_SHA.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_abbreviation_and_full_hash_agree() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/repos/acme/repo/commits/");
                then.status(200).json_body(json!({ "sha": FULL_SHA }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/commits");
                then.status(200).json_body(json!({ "items": [] }));
            })
            .await;

        let client = github(&server);
        let full = client.lookup_object(&repo(), &id(FULL_SHA)).await.unwrap();
        let abbreviated = client
            .lookup_object(&repo(), &id("a1b2c3d4"))
            .await
            .unwrap();
        assert_eq!(abbreviated, full);
    }

    #[tokio::test]
    async fn test_abbreviation_search_unique() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/repo/commits/a1b2c3d4");
                then.status(422)
                    .json_body(json!({ "message": "No commit found for SHA: a1b2c3d4" }));
            })
            .await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search/commits")
                    .query_param("q", "repo:acme/repo hash:a1b2c3d4");
                then.status(200).json_body(json!({
                    "total_count": 2,
                    "items": [
                        { "sha": FULL_SHA },
                        { "sha": FULL_SHA },
                        { "sha": "ffffffffffffffffffffffffffffffffffffffff" }
                    ]
                }));
            })
            .await;

        let lookup = github(&server)
            .lookup_object(&repo(), &id("a1b2c3d4"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            lookup,
            ObjectLookup::Commit {
                sha: FULL_SHA.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_abbreviation_search_ambiguous() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/repo/commits/a1b2c3d");
                then.status(422);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/commits");
                then.status(200).json_body(json!({
                    "items": [
                        { "sha": "a1b2c3d000000000000000000000000000000001" },
                        { "sha": "a1b2c3d000000000000000000000000000000002" }
                    ]
                }));
            })
            .await;

        let lookup = github(&server)
            .lookup_object(&repo(), &id("a1b2c3d"))
            .await
            .unwrap();
        assert_eq!(lookup, ObjectLookup::Ambiguous { matches: 2 });
    }

    #[tokio::test]
    async fn test_abbreviation_matching_ref_name_falls_back_to_search() {
        let server = MockServer::start_async().await;
        // A branch called "deadbee" points at an unrelated commit
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/repo/commits/deadbee");
                then.status(200).json_body(json!({ "sha": FULL_SHA }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/commits");
                then.status(200).json_body(json!({ "items": [] }));
            })
            .await;

        let lookup = github(&server)
            .lookup_object(&repo(), &id("deadbee"))
            .await
            .unwrap();
        assert_eq!(lookup, ObjectLookup::NotFound);
    }

    #[tokio::test]
    async fn test_commit_details() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/repos/acme/repo/commits/{FULL_SHA}"));
                then.status(200).json_body(json!({
                    "sha": FULL_SHA,
                    "commit": { "message": "Add CNN entry to Deep Learning section" },
                    "files": [
                        { "filename": "docs/deep_learning.md", "status": "modified" },
                        { "filename": "ANSWER.md", "status": "added" }
                    ]
                }));
            })
            .await;

        let details = github(&server)
            .lookup_commit_details(&repo(), FULL_SHA)
            .await
            .unwrap();

        assert_eq!(details.sha, FULL_SHA);
        assert_eq!(details.message, "Add CNN entry to Deep Learning section");
        assert_eq!(details.files, vec!["docs/deep_learning.md", "ANSWER.md"]);
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/repo/contents/ANSWER.md");
                then.status(502);
            })
            .await;

        let net = NetClient::new(NetConfig {
            retry_count: 2,
            retry_delay: Duration::from_millis(10),
            ..NetConfig::default()
        })
        .unwrap();
        let client = GitHubClient::new(net, &server.base_url()).unwrap();

        let err = client
            .lookup_file(&repo(), None, "ANSWER.md")
            .await
            .unwrap_err();

        assert_eq!(mock.hits_async().await, 3);
        assert!(matches!(
            err,
            Error::Network(NetworkError::HttpError { status: 502, .. })
        ));
        assert!(err.is_remote_unavailable());
    }

    #[tokio::test]
    async fn test_file_present_with_content() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/repos/acme/repo/contents/ANSWER.md")
                    .query_param("ref", "main");
                then.status(200).json_body(json!({
                    "type": "file",
                    "encoding": "base64",
                    "content": "YTFiMmMzZDRl\nNWY2\n"
                }));
            })
            .await;

        let lookup = github(&server)
            .lookup_file(&repo(), Some("main"), "ANSWER.md")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            lookup,
            FileLookup::Present {
                content: Some("a1b2c3d4e5f6".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_file_absent_and_directory() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/repo/contents/docs");
                then.status(200)
                    .json_body(json!([{ "type": "file", "name": "README.md" }]));
            })
            .await;

        let client = github(&server);
        assert_eq!(
            client.lookup_file(&repo(), None, "docs").await.unwrap(),
            FileLookup::Absent
        );
        assert_eq!(
            client.lookup_file(&repo(), None, "ANSWER.md").await.unwrap(),
            FileLookup::Absent
        );
    }

    #[tokio::test]
    async fn test_rate_limit_exhausted() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/repo/commits/a1b2c3d4");
                then.status(403)
                    .header("x-ratelimit-remaining", "0")
                    .header("retry-after", "30");
            })
            .await;

        let err = github(&server)
            .lookup_object(&repo(), &id("a1b2c3d4"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::RateLimited { seconds: 30 })
        ));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/repo/commits/a1b2c3d4");
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .json_body(json!({ "sha": FULL_SHA }));
            })
            .await;

        let net = NetClient::new(NetConfig {
            timeout: Duration::from_millis(100),
            ..NetConfig::default()
        })
        .unwrap();
        let client = GitHubClient::new(net, &server.base_url()).unwrap();

        let err = client
            .lookup_object(&repo(), &id("a1b2c3d4"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(NetworkError::Timeout { .. })));
    }
}
