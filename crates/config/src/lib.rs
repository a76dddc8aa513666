#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for shaproof
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/shaproof/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)
//!
//! The resulting `Config` is a plain value handed to each verification run;
//! there is no process-wide configuration state.

pub mod constants;

use serde::{Deserialize, Serialize};
use shaproof_errors::{ConfigError, Error};
use shaproof_types::{RepositoryRef, VerifyMode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub target: TargetConfig,
}

/// Verification policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub mode: VerifyMode,
    #[serde(default = "default_marker_file")]
    pub marker_file: String,
    #[serde(default)]
    pub check_answer_content: bool,
    /// Record the commit details diagnostic for resolved commits
    #[serde(default)]
    pub verify_commit_details: bool,
}

/// Hosting provider access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Name of the environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    #[serde(default)]
    pub retries: u32,
}

/// Repository under verification
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TargetConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    /// Branch or tag used when the commit itself cannot be checked
    pub reference: Option<String>,
    /// Entry the commit message is expected to mention
    pub entry: Option<String>,
    /// Section the commit message is expected to mention
    pub section: Option<String>,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            mode: VerifyMode::Strict,
            marker_file: default_marker_file(),
            check_answer_content: false,
            verify_commit_details: false,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            retries: 0,
        }
    }
}

fn parse_flag(field: &str, value: String) -> Result<bool, Error> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        }
        .into()),
    }
}

// Default value functions for serde
fn default_marker_file() -> String {
    constants::DEFAULT_MARKER_FILE.to_string()
}

fn default_api_url() -> String {
    constants::DEFAULT_API_URL.to_string()
}

fn default_token_env() -> String {
    constants::DEFAULT_TOKEN_ENV.to_string()
}

fn default_timeout() -> u64 {
    constants::DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout() -> u64 {
    5
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("shaproof").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value that cannot be parsed.
    pub fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), Error> {
        self.merge_mode_vars(&var)?;

        // ANSWER_FILE_NAME, overridden by SHAPROOF_MARKER_FILE
        for key in ["ANSWER_FILE_NAME", "SHAPROOF_MARKER_FILE"] {
            if let Some(marker) = var(key) {
                if marker.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: key.to_string(),
                        value: marker,
                    }
                    .into());
                }
                self.general.marker_file = marker.trim().to_string();
            }
        }

        if let Some(flag) = var("SHAPROOF_CHECK_ANSWER_CONTENT") {
            self.general.check_answer_content = parse_flag("SHAPROOF_CHECK_ANSWER_CONTENT", flag)?;
        }
        if let Some(flag) = var("SHAPROOF_VERIFY_COMMIT_DETAILS") {
            self.general.verify_commit_details =
                parse_flag("SHAPROOF_VERIFY_COMMIT_DETAILS", flag)?;
        }

        // SHAPROOF_API_URL
        if let Some(url) = var("SHAPROOF_API_URL") {
            self.remote.api_url = url;
        }

        // SHAPROOF_TIMEOUT
        if let Some(timeout) = var("SHAPROOF_TIMEOUT") {
            self.remote.timeout = match timeout.parse() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "SHAPROOF_TIMEOUT".to_string(),
                        value: timeout,
                    }
                    .into())
                }
            };
        }

        // Target repository
        if let Some(owner) = var("GITHUB_OWNER") {
            self.target.owner = Some(owner);
        }
        if let Some(repo) = var("TARGET_REPO") {
            self.target.repo = Some(repo);
        }
        if let Some(reference) = var("TARGET_BRANCH") {
            self.target.reference = Some(reference);
        }
        if let Some(entry) = var("TARGET_ENTRY").filter(|v| !v.trim().is_empty()) {
            self.target.entry = Some(entry);
        }
        if let Some(section) = var("TARGET_SECTION").filter(|v| !v.trim().is_empty()) {
            self.target.section = Some(section);
        }

        Ok(())
    }

    /// Merge only the mode selector from the environment
    ///
    /// Offline commands need nothing else, so unrelated bad variables do not
    /// stop them.
    ///
    /// # Errors
    ///
    /// Returns an error if `SHAPROOF_MODE` is not a known mode.
    pub fn merge_mode_env(&mut self) -> Result<(), Error> {
        self.merge_mode_vars(&|key: &str| std::env::var(key).ok())
    }

    fn merge_mode_vars(&mut self, var: &impl Fn(&str) -> Option<String>) -> Result<(), Error> {
        if let Some(mode) = var("SHAPROOF_MODE") {
            self.general.mode = mode.parse().map_err(|_| ConfigError::InvalidValue {
                field: "SHAPROOF_MODE".to_string(),
                value: mode,
            })?;
        }
        Ok(())
    }

    /// Repository reference built from the target section
    ///
    /// # Errors
    ///
    /// Returns an error if owner or repository is missing or invalid.
    pub fn repository(&self) -> Result<RepositoryRef, Error> {
        let (Some(owner), Some(repo)) = (&self.target.owner, &self.target.repo) else {
            return Err(ConfigError::MissingField {
                field: "repository".to_string(),
            }
            .into());
        };

        let repository = RepositoryRef::new(owner.as_str(), repo.as_str())?;
        match &self.target.reference {
            Some(reference) => Ok(repository.with_reference(reference.as_str())?),
            None => Ok(repository),
        }
    }

    /// API token read from the configured environment variable
    #[must_use]
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.remote.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }

    /// Per-request timeout
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout)
    }

    /// Connection establishment timeout
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.connect_timeout)
    }
}
