//! Swoole worker-server backend.
//!
//! The child is the runtime executable running the `swoole-server` entry
//! point, which reads its configuration from the handshake file.

use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

use warden_core::{LaunchConfiguration, ServerBackend};

/// Buffer and package size ceiling shared by several options.
const TEN_MIB: u64 = 10 * 1024 * 1024;

/// `SWOOLE_LOG_INFO`
const LOG_LEVEL_INFO: u64 = 2;
/// `SWOOLE_LOG_ERROR`
const LOG_LEVEL_ERROR: u64 = 5;

/// Probe script run by the runtime executable; exits 0 when the extension is loaded.
const EXTENSION_PROBE: &str =
    "exit(extension_loaded('swoole') || extension_loaded('openswoole') ? 0 : 1);";

/// Backend for a Swoole (or `OpenSwoole`) powered worker server.
#[derive(Debug, Clone)]
pub struct SwooleBackend {
    /// Runtime executable used for the extension probe.
    runtime: PathBuf,
}

impl SwooleBackend {
    /// Create a backend probing extensions with the given runtime executable
    pub fn new(runtime: impl Into<PathBuf>) -> Self {
        Self {
            runtime: runtime.into(),
        }
    }
}

impl ServerBackend for SwooleBackend {
    fn name(&self) -> &'static str {
        "swoole"
    }

    fn entry_point(&self) -> &'static str {
        "swoole-server"
    }

    fn is_installed(&self) -> bool {
        let status = Command::new(&self.runtime)
            .arg("-r")
            .arg(EXTENSION_PROBE)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                debug!(runtime = %self.runtime.display(), error = %e, "extension probe failed to run");
                false
            }
        }
    }

    fn cpu_count(&self) -> usize {
        num_cpus::get()
    }

    fn default_options(&self, config: &LaunchConfiguration) -> Map<String, Value> {
        let log_level = if config.environment == "local" {
            LOG_LEVEL_INFO
        } else {
            LOG_LEVEL_ERROR
        };
        let log_file = config.storage_path.join("logs").join("swoole_http.log");

        let mut options = Map::new();
        options.insert("buffer_output_size".into(), TEN_MIB.into());
        options.insert("daemonize".into(), false.into());
        options.insert("enable_coroutine".into(), false.into());
        options.insert(
            "log_file".into(),
            log_file.to_string_lossy().into_owned().into(),
        );
        options.insert("log_level".into(), log_level.into());
        options.insert("max_request".into(), config.max_requests.into());
        options.insert("package_max_length".into(), TEN_MIB.into());
        options.insert("reactor_num".into(), config.worker_count.into());
        options.insert("send_yield".into(), true.into());
        options.insert("socket_buffer_size".into(), TEN_MIB.into());
        options.insert("task_max_request".into(), config.max_requests.into());
        options.insert("task_worker_num".into(), config.task_worker_count.into());
        options.insert("worker_num".into(), config.worker_count.into());
        options
    }
}
