//! Stable defaults shared by the config file, environment merge and CLI

/// Marker file whose presence is required for a pass
pub const DEFAULT_MARKER_FILE: &str = "ANSWER.md";

pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
