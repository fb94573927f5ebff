//! CLI bootstrap - the composition root.
//!
//! Resolves installation and application paths from the parsed arguments and
//! builds the concrete runtime pieces (backend, launcher, coordination paths)
//! handed to the command handlers.

use std::path::{Path, PathBuf};

use warden_core::{ServerBackend, ServerStatePaths, SupervisorError, SupervisorResult};
use warden_runtime::{Launcher, SwooleBackend};

use crate::parser::Cli;

/// Resolved configuration shared by every command.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Installation root; entry point scripts live in `<root>/bin`.
    pub install_root: PathBuf,
    /// Runtime executable running the entry point.
    pub runtime: String,
    /// Application base path.
    pub base_path: PathBuf,
    /// Storage path holding coordination state under `logs/`.
    pub storage_path: PathBuf,
}

impl CliConfig {
    /// Build the configuration from parsed arguments, filling in defaults.
    pub fn from_cli(cli: &Cli) -> SupervisorResult<Self> {
        let install_root = match &cli.install_root {
            Some(root) => root.clone(),
            None => default_install_root()?,
        };

        let base_path = match &cli.base_path {
            Some(path) => path.clone(),
            None => std::env::current_dir()
                .map_err(|e| SupervisorError::io("Failed to read current directory", e))?,
        };

        let storage_path = cli
            .storage_path
            .clone()
            .unwrap_or_else(|| base_path.join("storage"));

        Ok(Self {
            install_root,
            runtime: cli.runtime.clone(),
            base_path,
            storage_path,
        })
    }

    /// Working directory of the server process
    pub fn bin_dir(&self) -> PathBuf {
        self.install_root.join("bin")
    }

    /// The server backend
    pub fn backend(&self) -> SwooleBackend {
        SwooleBackend::new(&self.runtime)
    }

    /// Launcher for the server process
    pub fn launcher(&self) -> Launcher {
        Launcher::new(&self.runtime, self.bin_dir())
    }

    /// Coordination file locations for `backend`
    pub fn state_paths(&self, backend: &dyn ServerBackend) -> ServerStatePaths {
        ServerStatePaths::new(&self.storage_path, backend.name())
    }
}

/// The directory above the one holding the `warden` executable.
///
/// An installation looks like `<root>/bin/warden` next to the entry point
/// scripts in `<root>/bin`.
fn default_install_root() -> SupervisorResult<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| SupervisorError::io("Failed to locate the warden executable", e))?;

    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            SupervisorError::configuration(format!(
                "Cannot derive an installation root from {}; pass --install-root",
                exe.display()
            ))
        })
}
