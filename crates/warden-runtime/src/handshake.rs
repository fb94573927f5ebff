//! State handshake file I/O.
//!
//! The handshake file is the child's only source of configuration: the
//! supervisor writes it immediately before each launch and the child reads it
//! once at startup.
//!
//! Format: a pretty-printed JSON object (see [`LaunchConfiguration`]).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use warden_core::{LaunchConfiguration, SupervisorError, SupervisorResult};

/// Write the handshake file atomically using temp file + rename.
///
/// # Atomicity
/// 1. Write to `.<name>.<pid>.tmp` in the same directory
/// 2. Rename over `<name>` (atomic on Unix/macOS)
///
/// A child starting concurrently sees either the previous file or the new
/// one, never a partial write.
///
/// # Errors
///
/// Returns `SupervisorError::Io` if the parent directory is missing, not
/// writable, or the disk is full. The launch must be aborted in that case.
pub fn write_handshake(path: &Path, config: &LaunchConfiguration) -> SupervisorResult<()> {
    let content = serde_json::to_vec_pretty(config).map_err(|e| {
        SupervisorError::io(
            format!("Failed to serialize launch configuration for {}", path.display()),
            io::Error::new(io::ErrorKind::InvalidData, e),
        )
    })?;

    let temp_path = temp_path_for(path);
    let result = fs::write(&temp_path, &content).and_then(|()| fs::rename(&temp_path, path));

    if let Err(e) = result {
        // Best effort: the temp file may not exist if the write itself failed
        let _ = fs::remove_file(&temp_path);
        return Err(SupervisorError::io(
            format!("Failed to write server state file {}", path.display()),
            e,
        ));
    }

    debug!(path = %path.display(), bytes = content.len(), "wrote server state file");
    Ok(())
}

/// Read a handshake file back.
pub fn read_handshake(path: &Path) -> SupervisorResult<LaunchConfiguration> {
    let content = fs::read(path).map_err(|e| {
        SupervisorError::io(format!("Failed to read server state file {}", path.display()), e)
    })?;

    serde_json::from_slice(&content).map_err(|e| {
        SupervisorError::io(
            format!("Malformed server state file {}", path.display()),
            io::Error::new(io::ErrorKind::InvalidData, e),
        )
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "state".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}
