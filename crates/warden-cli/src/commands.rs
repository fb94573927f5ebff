//! Subcommands and their arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use warden_core::WorkerCount;
use warden_core::config::{DEFAULT_HOST, DEFAULT_MAX_REQUESTS, DEFAULT_PORT};

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server and supervise it until it exits or is stopped
    Start(StartArgs),

    /// Stop a server left running by another supervisor and clear its state
    Stop,

    /// Report whether a server is running (exit code 0 when running, 1 otherwise)
    Status,
}

/// Options for `warden start`.
#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// IP address the server should bind to
    #[arg(long, env = "WARDEN_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port the server should listen on
    #[arg(long, env = "WARDEN_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u32,

    /// Number of request workers, or "auto" for one per CPU
    #[arg(long, env = "WARDEN_WORKERS", default_value = "auto")]
    pub workers: WorkerCount,

    /// Number of task workers, or "auto" for one per CPU
    #[arg(long = "task-workers", env = "WARDEN_TASK_WORKERS", default_value = "auto")]
    pub task_workers: WorkerCount,

    /// Requests a worker handles before it is recycled
    #[arg(long = "max-requests", env = "WARDEN_MAX_REQUESTS", default_value_t = DEFAULT_MAX_REQUESTS)]
    pub max_requests: u64,

    /// Ask the server to reload workers when application files change
    #[arg(long)]
    pub watch: bool,

    /// Application name passed to the server
    #[arg(long = "app-name", env = "APP_NAME", default_value = "warden")]
    pub app_name: String,

    /// Application environment (e.g. "local", "production")
    #[arg(long = "env", env = "APP_ENV", default_value = "production")]
    pub environment: String,

    /// Public assets path (defaults to `<base-path>/public`)
    #[arg(long = "public-path")]
    pub public_path: Option<PathBuf>,

    /// JSON file holding the application configuration passed to the server
    #[arg(long = "app-config")]
    pub app_config: Option<PathBuf>,
}
