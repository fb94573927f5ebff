//! Process verification to ensure a pid still belongs to our server.

use std::path::Path;

use super::pidfile::pid_exists;

#[cfg(target_os = "linux")]
use std::fs;

/// Check if a PID is alive and belongs to a server started with `state_file`.
///
/// # Platform behavior
/// - **Linux**: Reads `/proc/<pid>/cmdline` and requires the state file path
///   among the arguments (it is the child's sole positional argument)
/// - **Other**: Falls back to a plain existence check
///
/// # Safety
/// On Linux this returns `false` for reused PIDs, which prevents signalling
/// unrelated processes.
pub fn is_supervised_server(pid: u32, state_file: &Path) -> bool {
    if !pid_exists(pid) {
        return false;
    }

    #[cfg(target_os = "linux")]
    {
        cmdline_mentions(pid, state_file)
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = state_file;
        true
    }
}

#[cfg(target_os = "linux")]
fn cmdline_mentions(pid: u32, state_file: &Path) -> bool {
    let Ok(raw) = fs::read(format!("/proc/{pid}/cmdline")) else {
        return false;
    };

    let expected = state_file.as_os_str().as_encoded_bytes();
    raw.split(|&b| b == 0).any(|arg| arg == expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impossible_pid_is_not_ours() {
        assert!(!is_supervised_server(999_999, Path::new("/tmp/state.json")));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn self_is_not_a_supervised_server() {
        // The test binary was not started with a state file argument
        assert!(!is_supervised_server(
            std::process::id(),
            Path::new("/tmp/definitely-not-an-arg.json")
        ));
    }

    #[tokio::test]
    #[cfg(target_os = "linux")]
    async fn child_started_with_state_file_is_ours() {
        let dir = tempfile::TempDir::new().unwrap();
        let state_file = dir.path().join("state.json");
        std::fs::write(&state_file, "{}").unwrap();

        let mut child = tokio::process::Command::new("sh")
            .arg("-c")
            .arg("sleep 5; true")
            .arg(&state_file)
            .spawn()
            .expect("failed to spawn sh");
        let pid = child.id().expect("no PID");

        assert!(is_supervised_server(pid, &state_file));

        child.kill().await.unwrap();
    }
}
