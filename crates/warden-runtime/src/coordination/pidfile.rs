//! Atomic pid file I/O operations.
//!
//! Format: one-line text file
//! ```text
//! <pid>
//! ```

use std::fs;
use std::io;
use std::path::Path;

/// Write the pid file atomically using temp file + rename.
pub fn write_pidfile(path: &Path, pid: u32) -> io::Result<()> {
    let temp_path = path.with_extension("pid.tmp");

    fs::write(&temp_path, format!("{pid}\n"))?;
    fs::rename(&temp_path, path)
}

/// Read the pid recorded in a pid file.
pub fn read_pidfile(path: &Path) -> io::Result<u32> {
    let content = fs::read_to_string(path)?;

    content
        .lines()
        .next()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing or invalid PID"))
}

/// Delete a file (idempotent - no error if missing).
pub fn delete_pidfile(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Check if a PID exists.
///
/// Uses `kill` with null signal which doesn't send a signal but checks existence.
#[cfg(unix)]
pub fn pid_exists(pid: u32) -> bool {
    use nix::sys::signal;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };

    match signal::kill(Pid::from_raw(raw), None) {
        Ok(()) => true,
        Err(nix::errno::Errno::ESRCH) => false, // No such process
        Err(_) => true,                         // Process exists but we lack permission
    }
}

#[cfg(not(unix))]
pub fn pid_exists(_pid: u32) -> bool {
    false // Not implemented on non-Unix
}
