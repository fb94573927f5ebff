//! Stop collaborator that clears a server's coordination state.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use warden_core::{ServerStatePaths, ServerStopper, SupervisorError, SupervisorResult};

use super::pidfile::{delete_pidfile, read_pidfile};
use super::verify::is_supervised_server;
use crate::process::shutdown::kill_pid;

/// Stops a server recorded under `<storage>/logs` and removes its files.
///
/// # Strategy
/// 1. Read the pid file for the named server
/// 2. If the pid is alive and verified as our server, SIGTERM → SIGKILL it
/// 3. Delete the pid file and the handshake file
///
/// Every step tolerates missing state, so repeated calls are no-ops.
#[derive(Debug, Clone)]
pub struct StateFileStopper {
    storage_path: PathBuf,
}

impl StateFileStopper {
    /// Create a stopper for servers whose state lives under `storage_path`
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }
}

#[async_trait]
impl ServerStopper for StateFileStopper {
    async fn stop(&self, server: &str) -> SupervisorResult<()> {
        let paths = ServerStatePaths::new(&self.storage_path, server);

        match read_pidfile(&paths.pid_file) {
            Ok(pid) if is_supervised_server(pid, &paths.state_file) => {
                info!(server = %server, pid = %pid, "Stopping running server");
                kill_pid(pid).await.map_err(|e| {
                    SupervisorError::io(format!("Failed to stop {server} server (PID {pid})"), e)
                })?;
            }
            Ok(pid) => {
                debug!(server = %server, pid = %pid, "recorded server is no longer running");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(server = %server, "no pid file, nothing to stop");
            }
            Err(e) => {
                warn!(server = %server, error = %e, "unreadable pid file, removing it");
            }
        }

        for path in [&paths.pid_file, &paths.state_file] {
            delete_pidfile(path).map_err(|e| {
                SupervisorError::io(format!("Failed to remove {}", path.display()), e)
            })?;
        }

        Ok(())
    }
}
