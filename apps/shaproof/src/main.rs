//! shaproof - commit identifier verification
//!
//! This is the CLI application that wires configuration, the GitHub client
//! and the verification core together, renders the verdict and maps it to an
//! exit status.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands};
use crate::display::{CommandOutcome, OutputRenderer};
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use shaproof_config::Config;
use shaproof_events::{EventReceiver, EventSender};
use shaproof_net::{GitHubClient, NetClient, NetConfig};
use shaproof_verify::{
    check_format, parse_identifier, Verifier, VerifyOptions, VerifyRequest,
};
use std::process;
use tokio::select;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Initialize tracing with JSON awareness
    init_tracing(json_mode, cli.global.debug);

    match run(cli).await {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(e) => {
            error!("Application error: {}", e);
            if json_mode {
                println!("{}", e.to_json());
            } else {
                eprintln!("Error: {e}");
            }
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<CommandOutcome, CliError> {
    info!("Starting shaproof v{}", env!("CARGO_PKG_VERSION"));

    let config = resolve_config(&cli).await?;

    // Create event channel
    let (event_sender, event_receiver) = shaproof_events::channel();

    let colors_enabled = console::Term::stdout().features().colors_supported();
    let renderer = OutputRenderer::new(cli.global.json, colors_enabled);
    let mut event_handler = EventHandler::new(
        console::Term::stderr().features().colors_supported(),
        cli.global.json,
        cli.global.debug,
    );

    // Execute command with event handling
    let outcome = execute_command_with_events(
        cli.command,
        config,
        event_sender,
        event_receiver,
        &mut event_handler,
    )
    .await?;

    // Render final result
    renderer.render_result(&outcome)?;

    debug!(exit_code = outcome.exit_code(), "Command completed");
    Ok(outcome)
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    config: Config,
    event_sender: EventSender,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<CommandOutcome, CliError> {
    let mut command_future = Box::pin(execute_command(command, config, event_sender));
    let mut events_open = true;

    // Handle events concurrently with command execution
    loop {
        select! {
            // Command completed
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            // Event received
            event = event_receiver.recv(), if events_open => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => events_open = false,
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    config: Config,
    event_sender: EventSender,
) -> Result<CommandOutcome, CliError> {
    match command {
        Commands::Verify { identifier, .. } => {
            let repository = config.repository()?;
            let verifier = Verifier::new(github_client(&config)?).with_events(event_sender);
            let verdict = verifier
                .verify(
                    &VerifyRequest::new(repository, identifier),
                    &VerifyOptions::from_config(&config),
                )
                .await?;
            Ok(CommandOutcome::Verdict(verdict))
        }

        Commands::Normalize { identifier } => {
            let identifier = parse_identifier(&identifier).map_err(shaproof_errors::Error::from)?;
            Ok(CommandOutcome::Normalized(identifier))
        }

        Commands::Format { identifier, .. } => {
            let identifier = parse_identifier(&identifier).map_err(shaproof_errors::Error::from)?;
            let mode = config.general.mode;
            let result = check_format(&identifier, mode);
            Ok(CommandOutcome::Format {
                identifier,
                mode,
                result,
            })
        }
    }
}

/// Load only the configuration the command reads
///
/// `verify` merges file, environment and flags in that order. Offline
/// commands skip sources they never consult, so a broken remote setting
/// cannot stop them.
async fn resolve_config(cli: &Cli) -> Result<Config, CliError> {
    let path = cli.global.config.as_deref();
    let mut config = match &cli.command {
        Commands::Verify { .. } => {
            let mut config = Config::load_or_default(path).await?;
            config.merge_env()?;
            config
        }
        Commands::Format { mode: None, .. } => {
            let mut config = Config::load_or_default(path).await?;
            config.merge_mode_env()?;
            config
        }
        Commands::Format { mode: Some(_), .. } | Commands::Normalize { .. } => {
            Config::default()
        }
    };

    apply_cli_config(&mut config, &cli.command)?;
    Ok(config)
}

/// Build the GitHub client from remote settings
fn github_client(config: &Config) -> Result<GitHubClient, CliError> {
    let net = NetClient::new(NetConfig {
        timeout: config.request_timeout(),
        connect_timeout: config.connect_timeout(),
        retry_count: config.remote.retries,
        ..NetConfig::default()
    })?;

    let client = GitHubClient::new(net, &config.remote.api_url)?;
    match config.token() {
        Some(token) => Ok(client.with_token(&token)?),
        None => {
            debug!(
                token_env = %config.remote.token_env,
                "no API token configured, using unauthenticated requests"
            );
            Ok(client)
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let filter = |default: &str| {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
    };

    if json_mode {
        if debug_enabled {
            // JSON log lines on stderr keep stdout machine-readable
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(filter("info,shaproof=debug"))
                .init();
        } else {
            // Disable all logging in JSON mode
            tracing_subscriber::fmt()
                .with_writer(std::io::sink)
                .with_env_filter("off")
                .init();
        }
    } else if debug_enabled {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter("info,shaproof=debug,shaproof_net=debug"))
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter("warn,shaproof=warn"))
            .init();
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, command: &Commands) -> Result<(), CliError> {
    match command {
        Commands::Verify {
            repo,
            mode,
            marker_file,
            check_answer_content,
            commit_details,
            timeout,
            api_url,
            ..
        } => {
            if let Some(repo) = repo {
                config.target.owner = Some(repo.owner().to_string());
                config.target.repo = Some(repo.name().to_string());
                config.target.reference = repo.reference().map(str::to_string);
            }
            if let Some(mode) = mode {
                config.general.mode = *mode;
            }
            if let Some(marker_file) = marker_file {
                if marker_file.trim().is_empty() {
                    return Err(CliError::InvalidArguments(
                        "--marker-file must not be empty".to_string(),
                    ));
                }
                config.general.marker_file = marker_file.trim().to_string();
            }
            if *check_answer_content {
                config.general.check_answer_content = true;
            }
            if *commit_details {
                config.general.verify_commit_details = true;
            }
            if let Some(timeout) = timeout {
                if *timeout == 0 {
                    return Err(CliError::InvalidArguments(
                        "--timeout must be at least 1 second".to_string(),
                    ));
                }
                config.remote.timeout = *timeout;
            }
            if let Some(api_url) = api_url {
                config.remote.api_url.clone_from(api_url);
            }
        }
        Commands::Format {
            mode: Some(mode), ..
        } => {
            config.general.mode = *mode;
        }
        Commands::Format { mode: None, .. } | Commands::Normalize { .. } => {}
    }

    Ok(())
}
