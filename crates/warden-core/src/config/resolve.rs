//! Configuration resolver.
//!
//! Turns [`LaunchOptions`] into a [`LaunchConfiguration`]. The backend's CPU
//! count is queried at most once per call, and only when a count is `auto`.

use serde_json::Map;

use super::{LaunchConfiguration, LaunchOptions, WorkerCount};
use crate::error::{SupervisorError, SupervisorResult};
use crate::ports::ServerBackend;

/// Resolve raw launch options against a backend.
///
/// # Errors
///
/// Returns `SupervisorError::Configuration` if:
/// - the host is empty or contains whitespace
/// - the port is outside `1..=65535`
/// - an explicit worker count is below 1, or an explicit task worker count below 0
pub fn resolve(
    options: LaunchOptions,
    backend: &dyn ServerBackend,
) -> SupervisorResult<LaunchConfiguration> {
    let host = validate_host(&options.host)?;
    let port = validate_port(options.port)?;

    let mut detected = None;
    let mut cpu_count = || {
        *detected.get_or_insert_with(|| {
            u32::try_from(backend.cpu_count().max(1)).unwrap_or(u32::MAX)
        })
    };

    let worker_count = resolve_count(options.workers, "workers", 1, &mut cpu_count)?;
    let task_worker_count = resolve_count(options.task_workers, "task workers", 0, &mut cpu_count)?;

    let mut config = LaunchConfiguration {
        app_name: options.app_name,
        environment: options.environment,
        base_path: options.base_path,
        host,
        port,
        worker_count,
        task_worker_count,
        max_requests: options.max_requests,
        watch: options.watch,
        public_path: options.public_path,
        storage_path: options.storage_path,
        default_server_options: Map::new(),
        application_config: options.application_config,
    };
    config.default_server_options = backend.default_options(&config);

    Ok(config)
}

fn validate_host(host: &str) -> SupervisorResult<String> {
    let trimmed = host.trim();
    if trimmed.is_empty() {
        return Err(SupervisorError::configuration("host cannot be empty"));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(SupervisorError::configuration(format!(
            "host {host:?} contains whitespace"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_port(port: u32) -> SupervisorResult<u16> {
    match u16::try_from(port) {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(SupervisorError::configuration(format!(
            "port {port} is outside the valid range 1-65535"
        ))),
    }
}

fn resolve_count(
    value: WorkerCount,
    label: &str,
    minimum: i64,
    cpu_count: &mut impl FnMut() -> u32,
) -> SupervisorResult<u32> {
    match value {
        WorkerCount::Auto => Ok(cpu_count()),
        WorkerCount::Fixed(n) if n >= minimum => u32::try_from(n).map_err(|_| {
            SupervisorError::configuration(format!("{label} count {n} is too large"))
        }),
        WorkerCount::Fixed(n) => Err(SupervisorError::configuration(format!(
            "{label} must be \"auto\" or an integer >= {minimum}, got {n}"
        ))),
    }
}
