//! Integration tests for shaproof CLI

use std::process::{Command, Output};

const SHA: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678";

/// Run the binary with a clean environment for configuration variables
fn shaproof(args: &[&str]) -> Output {
    shaproof_with_env(args, &[])
}

/// Like `shaproof`, with extra environment variables set
fn shaproof_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_shaproof"));
    for var in [
        "GITHUB_TOKEN",
        "GITHUB_OWNER",
        "TARGET_REPO",
        "TARGET_BRANCH",
        "ANSWER_FILE_NAME",
        "SHAPROOF_MODE",
        "SHAPROOF_MARKER_FILE",
        "SHAPROOF_CHECK_ANSWER_CONTENT",
        "SHAPROOF_VERIFY_COMMIT_DETAILS",
        "TARGET_ENTRY",
        "TARGET_SECTION",
        "SHAPROOF_API_URL",
        "SHAPROOF_TIMEOUT",
        "RUST_LOG",
    ] {
        command.env_remove(var);
    }
    command.envs(env.iter().copied());
    // An empty config home keeps any user config out of the run
    let config_home = tempfile::tempdir().expect("Failed to create temp dir");
    command
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(args)
        .output()
        .expect("Failed to execute shaproof")
}

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_shaproof"))
        .arg("--version")
        .output()
        .expect("Failed to execute shaproof");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("shaproof"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_shaproof"))
        .arg("--help")
        .output()
        .expect("Failed to execute shaproof");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Verify that a commit identifier exists in a GitHub repository"));
    assert!(stdout.contains("verify"));
    assert!(stdout.contains("normalize"));
    assert!(stdout.contains("format"));
}

#[test]
fn test_cli_invalid_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_shaproof"))
        .arg("invalid-command")
        .output()
        .expect("Failed to execute shaproof");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_normalize_commit_url() {
    let url = format!("https://github.com/Acme/Repo/commit/{}", SHA.to_uppercase());
    let output = shaproof(&["normalize", &url]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), SHA);
}

#[test]
fn test_normalize_empty_is_usage_error() {
    let output = shaproof(&["normalize", "   "]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_format_rejects_non_hex_json() {
    let output = shaproof(&["--json", "format", "zzzz123", "--mode", "lenient"]);

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["identifier"], "zzzz123");
    assert_eq!(json["mode"], "lenient");
    assert_eq!(json["check"]["pass"], false);
}

#[test]
fn test_format_strict_rejects_abbreviation() {
    let output = shaproof(&["format", "a1b2c3d"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("INVALID"));
}

#[test]
fn test_verify_missing_repository_is_usage_error() {
    let output = shaproof(&["--json", "verify", SHA]);

    assert_eq!(output.status.code(), Some(2));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert!(json["error"]["message"].is_string());
}

#[test]
fn test_verify_passes_against_mock_api() {
    use httpmock::prelude::*;
    use serde_json::json;

    let server = MockServer::start();
    let commit = server.mock(|when, then| {
        when.method(GET).path(format!("/repos/acme/repo/commits/{SHA}"));
        then.status(200).json_body(json!({ "sha": SHA }));
    });
    let marker = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/repo/contents/ANSWER.md")
            .query_param("ref", SHA);
        then.status(200).json_body(json!({
            "type": "file",
            "encoding": "base64",
            "content": ""
        }));
    });

    let output = shaproof(&[
        "--json",
        "verify",
        SHA,
        "--repo",
        "acme/repo",
        "--api-url",
        &server.base_url(),
    ]);

    commit.assert();
    marker.assert();
    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["pass"], true);
    assert_eq!(json["status"], "completed");
    assert_eq!(json["resolved"], SHA);
}

#[test]
fn test_verify_missing_marker_fails() {
    use httpmock::prelude::*;
    use serde_json::json;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/repos/acme/repo/commits/{SHA}"));
        then.status(200).json_body(json!({ "sha": SHA }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/repos/acme/repo/contents/PROOF.md");
        then.status(404).json_body(json!({ "message": "Not Found" }));
    });

    let output = shaproof(&[
        "verify",
        SHA,
        "--repo",
        "acme/repo",
        "--marker-file",
        "PROOF.md",
        "--api-url",
        &server.base_url(),
    ]);

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FAIL"));
}

#[test]
fn test_verify_unreachable_remote_is_inconclusive() {
    let output = shaproof(&[
        "--json",
        "verify",
        SHA,
        "--repo",
        "acme/repo",
        "--timeout",
        "5",
        "--api-url",
        "http://127.0.0.1:1",
    ]);

    assert_eq!(output.status.code(), Some(75), "{output:?}");
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["pass"], false);
    assert_eq!(json["status"], "inconclusive");
    assert_eq!(json["inconclusive_stage"], "checking_remote");
}

#[test]
fn test_explicit_config_file_is_used() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "[general]\nmode = \"lenient\"").expect("Failed to write config");
    let path = file.path().to_string_lossy().into_owned();

    let output = shaproof(&["--config", &path, "format", "a1b2c3d"]);

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("VALID"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let output = shaproof(&["--config", "/nonexistent/shaproof.toml", "format", SHA]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_verify_zero_timeout_rejected() {
    let output = shaproof(&["verify", SHA, "--repo", "acme/repo", "--timeout", "0"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_verify_invalid_api_url_is_usage_error() {
    let output = shaproof(&[
        "--json",
        "verify",
        SHA,
        "--repo",
        "acme/repo",
        "--api-url",
        "not a url",
    ]);

    assert_eq!(output.status.code(), Some(2), "{output:?}");
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["error"]["code"], "config.invalid_value");
}

#[test]
fn test_verify_bad_environment_is_usage_error() {
    let output = shaproof_with_env(
        &["verify", SHA, "--repo", "acme/repo"],
        &[("SHAPROOF_TIMEOUT", "soon")],
    );

    assert_eq!(output.status.code(), Some(2), "{output:?}");
}

#[test]
fn test_normalize_ignores_bad_environment() {
    let output = shaproof_with_env(
        &["normalize", SHA],
        &[("SHAPROOF_TIMEOUT", "soon"), ("SHAPROOF_MODE", "bogus")],
    );

    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), SHA);
}

#[test]
fn test_format_reads_only_mode_from_environment() {
    let output = shaproof_with_env(
        &["format", "a1b2c3d"],
        &[("SHAPROOF_MODE", "lenient"), ("SHAPROOF_TIMEOUT", "soon")],
    );

    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("VALID"));
}

#[test]
fn test_verify_commit_details_warnings_keep_pass() {
    use httpmock::prelude::*;
    use serde_json::json;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/repos/acme/repo/commits/{SHA}"));
        then.status(200).json_body(json!({
            "sha": SHA,
            "commit": { "message": "Update notes" },
            "files": [{ "filename": "notes.txt" }]
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/repo/contents/ANSWER.md")
            .query_param("ref", SHA);
        then.status(200).json_body(json!({
            "type": "file",
            "encoding": "base64",
            "content": ""
        }));
    });

    let output = shaproof_with_env(
        &[
            "--json",
            "verify",
            SHA,
            "--repo",
            "acme/repo",
            "--commit-details",
            "--api-url",
            &server.base_url(),
        ],
        &[("TARGET_ENTRY", "Convolutional Networks")],
    );

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["pass"], true);
    let checks = json["checks"].as_array().expect("checks should be an array");
    let details = checks.last().expect("commit details check");
    assert_eq!(details["name"], "commit_details");
    assert_eq!(details["diagnostic"], true);
    assert_eq!(details["pass"], false);
}
