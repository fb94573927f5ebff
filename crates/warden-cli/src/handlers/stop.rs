//! Stop command handler.
//!
//! Stops a server started by another `warden start` (for example one running
//! under a process manager) and clears its coordination files.

use warden_core::{InstanceProbe, ReportSink, ServerBackend, ServerStopper, SupervisorResult};
use warden_runtime::{PidFileProbe, StateFileStopper};

use crate::bootstrap::CliConfig;

/// Execute the stop command.
///
/// Exit code 1 when no server was running; stale coordination files are
/// cleared either way.
pub async fn execute(config: &CliConfig, sink: &dyn ReportSink) -> SupervisorResult<i32> {
    let backend = config.backend();
    let running = PidFileProbe::new(&config.state_paths(&backend)).is_running();

    if running {
        sink.info("Stopping server...");
    } else {
        sink.error("Server is not running.");
    }

    StateFileStopper::new(&config.storage_path)
        .stop(backend.name())
        .await?;

    Ok(if running { 0 } else { 1 })
}
