//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the warden process supervisor.
///
/// Global options locate the installation and the application; subcommands
/// start, stop or query the supervised server.
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(about = "Launch and supervise a multi-worker application server")]
#[command(version)]
pub struct Cli {
    /// Installation root containing the `bin` directory with server entry points
    #[arg(long = "install-root", global = true, env = "WARDEN_INSTALL_ROOT")]
    pub install_root: Option<PathBuf>,

    /// Application base path (defaults to the current directory)
    #[arg(long = "base-path", global = true, env = "APP_BASE_PATH")]
    pub base_path: Option<PathBuf>,

    /// Storage path (defaults to `<base-path>/storage`)
    #[arg(long = "storage-path", global = true)]
    pub storage_path: Option<PathBuf>,

    /// Runtime executable that runs the server entry point
    #[arg(long, global = true, env = "WARDEN_RUNTIME", default_value = "php")]
    pub runtime: String,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
