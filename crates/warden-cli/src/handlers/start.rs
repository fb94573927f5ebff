//! Start command handler.
//!
//! Builds launch options from the arguments and runs the supervisor until the
//! server exits or a stop signal arrives.

use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;
use warden_core::{LaunchOptions, SupervisorError, SupervisorResult};
use warden_runtime::Supervisor;

use crate::bootstrap::CliConfig;
use crate::commands::StartArgs;
use crate::presentation::ConsoleSink;

/// Execute the start command.
///
/// Returns the server's exit code after a requested stop; a server that
/// exits non-zero on its own is reported as an error.
pub async fn execute(config: &CliConfig, args: StartArgs) -> SupervisorResult<i32> {
    let options = build_options(config, args)?;
    debug!(
        base_path = %options.base_path.display(),
        storage_path = %options.storage_path.display(),
        "starting supervised server"
    );

    let supervisor = Supervisor::new(
        Arc::new(config.backend()),
        config.launcher(),
        Arc::new(ConsoleSink::new()),
    );
    supervisor.run(options).await
}

fn build_options(config: &CliConfig, args: StartArgs) -> SupervisorResult<LaunchOptions> {
    let application_config = match &args.app_config {
        Some(path) => load_app_config(path)?,
        None => Map::new(),
    };

    let mut options = LaunchOptions::new(&config.base_path)
        .with_host(args.host)
        .with_port(args.port)
        .with_workers(args.workers, args.task_workers)
        .with_max_requests(args.max_requests)
        .with_environment(args.environment)
        .with_storage_path(config.storage_path.clone());

    options.watch = args.watch;
    options.app_name = args.app_name;
    options.application_config = application_config;
    if let Some(public_path) = args.public_path {
        options.public_path = public_path;
    }

    Ok(options)
}

/// Read the opaque application configuration; it must be a JSON object.
fn load_app_config(path: &Path) -> SupervisorResult<Map<String, Value>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        SupervisorError::io(
            format!("Failed to read application config {}", path.display()),
            e,
        )
    })?;

    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SupervisorError::configuration(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
        Err(e) => Err(SupervisorError::configuration(format!(
            "{} is not valid JSON: {e}",
            path.display()
        ))),
    }
}
