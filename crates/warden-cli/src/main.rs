//! CLI entry point - the composition root.
//!
//! Loads `.env`, parses arguments, installs tracing and dispatches to the
//! command handlers. Handler errors become a message on stderr and the
//! error's exit code.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use warden_cli::presentation::ConsoleSink;
use warden_cli::{Cli, CliConfig, Commands, handlers};
use warden_core::SupervisorResult;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => exit_code(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<i32> {
    // Load environment variables before parsing so env-backed flags see them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match dispatch(cli).await {
        Ok(code) => Ok(code),
        Err(e) => {
            eprintln!("{e}");
            Ok(e.exit_code())
        }
    }
}

async fn dispatch(cli: Cli) -> SupervisorResult<i32> {
    let config = CliConfig::from_cli(&cli)?;
    let sink = ConsoleSink::new();

    match cli.command {
        Commands::Start(args) => handlers::start::execute(&config, args).await,
        Commands::Stop => handlers::stop::execute(&config, &sink).await,
        Commands::Status => handlers::status::execute(&config, &sink),
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialise logging")
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}
