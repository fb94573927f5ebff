//! Process Launcher: turns a resolved configuration into a running child.
//!
//! The child receives its whole configuration through the handshake file, so
//! the command line carries only the entry point script and that file's path.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};
use warden_core::{LaunchConfiguration, SupervisorError, SupervisorResult};

use super::handle::ProcessHandle;

/// Environment marker telling the child it runs under the supervisor.
pub const SUPERVISED_ENV: &str = "WARDEN_SUPERVISED";

/// Builds and spawns the server process.
///
/// # Example
///
/// ```rust,ignore
/// let launcher = Launcher::new("php", "/opt/warden/bin");
/// let handle = launcher.launch(&config, "swoole-server", &paths.state_file)?;
/// ```
#[derive(Debug, Clone)]
pub struct Launcher {
    runtime: PathBuf,
    bin_dir: PathBuf,
}

impl Launcher {
    /// `runtime` is the interpreter executable (a name looked up on `PATH`, or
    /// a path); `bin_dir` holds the entry point scripts and becomes the child's
    /// working directory.
    pub fn new(runtime: impl Into<PathBuf>, bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime: runtime.into(),
            bin_dir: bin_dir.into(),
        }
    }

    /// Directory the child runs in
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Locate the runtime executable.
    pub fn resolve_runtime(&self) -> SupervisorResult<PathBuf> {
        which::which(&self.runtime).map_err(|e| {
            SupervisorError::Spawn(format!(
                "runtime executable '{}' not found: {e}",
                self.runtime.display()
            ))
        })
    }

    /// Build the command without spawning it.
    ///
    /// The command is constructed with:
    /// 1. The resolved runtime executable
    /// 2. The entry point script (relative to the bin directory)
    /// 3. The handshake file path as the sole positional argument
    pub fn command(
        &self,
        config: &LaunchConfiguration,
        entry_point: &str,
        handshake: &Path,
    ) -> SupervisorResult<Command> {
        let program = self.resolve_runtime()?;

        let mut cmd = Command::new(program);
        cmd.arg(entry_point)
            .arg(handshake)
            .current_dir(&self.bin_dir)
            .env("APP_ENV", &config.environment)
            .env("APP_BASE_PATH", &config.base_path)
            .env(SUPERVISED_ENV, "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Terminal-generated signals should reach only the supervisor,
        // which forwards them itself
        #[cfg(unix)]
        cmd.process_group(0);

        Ok(cmd)
    }

    /// Spawn the child and start capturing its output.
    ///
    /// Fails with `Spawn` when the runtime cannot be found or the OS refuses
    /// to create the process. The handshake file is left in place either way.
    pub fn launch(
        &self,
        config: &LaunchConfiguration,
        entry_point: &str,
        handshake: &Path,
    ) -> SupervisorResult<ProcessHandle> {
        let mut cmd = self.command(config, entry_point, handshake)?;
        debug!(
            program = %self.runtime.display(),
            entry_point,
            cwd = %self.bin_dir.display(),
            "spawning server process"
        );

        let child = cmd.spawn().map_err(|e| {
            SupervisorError::Spawn(format!(
                "{} {entry_point}: {e}",
                self.runtime.display()
            ))
        })?;

        let handle = ProcessHandle::new(child)
            .map_err(|e| SupervisorError::Spawn(e.to_string()))?;
        info!(pid = %handle.pid(), entry_point, "server process started");
        Ok(handle)
    }
}
