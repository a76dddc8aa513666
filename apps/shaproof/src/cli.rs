//! Command line interface definition

use clap::{Parser, Subcommand};
use shaproof_types::{RepositoryRef, VerifyMode};
use std::path::PathBuf;

/// shaproof - verify that a commit identifier exists in a repository
#[derive(Parser)]
#[command(name = "shaproof")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verify that a commit identifier exists in a GitHub repository")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Verify an identifier against the remote repository
    Verify {
        /// Commit hash, abbreviation, or commit URL
        identifier: String,

        /// Target repository, overriding the configured one
        #[arg(long, value_name = "OWNER/NAME[@REF]")]
        repo: Option<RepositoryRef>,

        /// Identifier policy
        #[arg(long, value_enum)]
        mode: Option<VerifyMode>,

        /// File that must exist at the verified commit
        #[arg(long, value_name = "NAME")]
        marker_file: Option<String>,

        /// Also require the marker file to name the verified commit
        #[arg(long)]
        check_answer_content: bool,

        /// Warn when the commit touches no Markdown or its message omits the targets
        #[arg(long)]
        commit_details: bool,

        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// GitHub API base URL
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
    },

    /// Print the normalized form of an identifier
    Normalize {
        /// Commit hash, abbreviation, or commit URL
        identifier: String,
    },

    /// Check identifier format without contacting the remote
    Format {
        /// Commit hash, abbreviation, or commit URL
        identifier: String,

        /// Identifier policy
        #[arg(long, value_enum)]
        mode: Option<VerifyMode>,
    },
}
