//! Resolved launch configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Everything the child process needs to boot, fully resolved.
///
/// This is the content of the handshake file. Keys are camelCase on the wire;
/// unknown keys are ignored when reading and the optional ones default, so
/// older and newer children can share the format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfiguration {
    /// Application name.
    pub app_name: String,
    /// Application environment name.
    #[serde(default)]
    pub environment: String,
    /// Application base path.
    #[serde(default)]
    pub base_path: PathBuf,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Request worker count, always at least 1.
    #[serde(rename = "workers")]
    pub worker_count: u32,
    /// Task worker count, 0 disables task workers.
    #[serde(rename = "taskWorkers")]
    pub task_worker_count: u32,
    /// Requests a worker handles before it is recycled.
    pub max_requests: u64,
    /// Whether file watching was requested.
    #[serde(default)]
    pub watch: bool,
    /// Public assets path.
    pub public_path: PathBuf,
    /// Storage path.
    pub storage_path: PathBuf,
    /// Backend tuning options derived from the fields above.
    #[serde(default)]
    pub default_server_options: Map<String, Value>,
    /// Opaque application configuration.
    #[serde(default)]
    pub application_config: Map<String, Value>,
}

impl LaunchConfiguration {
    /// Address the server binds to, as `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
