//! Liveness probe backed by the pid file.

use std::path::PathBuf;
use tracing::debug;

use warden_core::{InstanceProbe, ServerStatePaths};

use super::pidfile::read_pidfile;
use super::verify::is_supervised_server;

/// Reports a server as running when its pid file names a live process that
/// was started with the matching state file.
#[derive(Debug, Clone)]
pub struct PidFileProbe {
    pid_file: PathBuf,
    state_file: PathBuf,
}

impl PidFileProbe {
    /// Create a probe for the given coordination paths
    pub fn new(paths: &ServerStatePaths) -> Self {
        Self {
            pid_file: paths.pid_file.clone(),
            state_file: paths.state_file.clone(),
        }
    }
}

impl InstanceProbe for PidFileProbe {
    fn is_running(&self) -> bool {
        match read_pidfile(&self.pid_file) {
            Ok(pid) => {
                let running = is_supervised_server(pid, &self.state_file);
                debug!(pid = %pid, running = %running, "checked recorded server pid");
                running
            }
            Err(e) => {
                debug!(path = %self.pid_file.display(), error = %e, "no usable pid file");
                false
            }
        }
    }
}
