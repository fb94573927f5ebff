//! Status command handler.

use warden_core::{InstanceProbe, ReportSink, SupervisorResult};
use warden_runtime::PidFileProbe;

use crate::bootstrap::CliConfig;

/// Execute the status command.
///
/// Exit code 0 when a server is running, 1 otherwise.
pub fn execute(config: &CliConfig, sink: &dyn ReportSink) -> SupervisorResult<i32> {
    let backend = config.backend();
    let probe = PidFileProbe::new(&config.state_paths(&backend));

    if probe.is_running() {
        sink.info("Server is running.");
        Ok(0)
    } else {
        sink.info("Server is not running.");
        Ok(1)
    }
}
