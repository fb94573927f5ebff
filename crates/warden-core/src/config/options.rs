//! Raw launch options.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::WorkerCount;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port.
pub const DEFAULT_PORT: u32 = 8000;
/// Default number of requests a worker serves before it is recycled.
pub const DEFAULT_MAX_REQUESTS: u64 = 500;

/// Launch options exactly as the operator supplied them.
///
/// Values are unvalidated: the port may be out of range and worker counts may
/// still be `auto`. Call [`resolve`](super::resolve) to obtain a
/// [`LaunchConfiguration`](super::LaunchConfiguration).
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    /// Bind address for the worker server.
    pub host: String,
    /// Bind port, checked against the network port range on resolution.
    pub port: u32,
    /// Request worker count.
    pub workers: WorkerCount,
    /// Background task worker count.
    pub task_workers: WorkerCount,
    /// Requests a worker handles before it is recycled (0 = unlimited).
    pub max_requests: u64,
    /// Whether the operator asked for file watching.
    pub watch: bool,
    /// Application name passed through to the child.
    pub app_name: String,
    /// Application environment name (`local`, `production`, ...).
    pub environment: String,
    /// Application base path.
    pub base_path: PathBuf,
    /// Public assets path.
    pub public_path: PathBuf,
    /// Storage path; coordination state lives under `<storage>/logs`.
    pub storage_path: PathBuf,
    /// Opaque application configuration for the child's own use.
    pub application_config: Map<String, Value>,
}

impl LaunchOptions {
    /// Create options with defaults rooted at `base_path`.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        let base_path = base_path.as_ref().to_path_buf();
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: WorkerCount::Auto,
            task_workers: WorkerCount::Auto,
            max_requests: DEFAULT_MAX_REQUESTS,
            watch: false,
            app_name: "warden".to_string(),
            environment: "production".to_string(),
            public_path: base_path.join("public"),
            storage_path: base_path.join("storage"),
            base_path,
            application_config: Map::new(),
        }
    }

    /// Set the bind host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the bind port.
    #[must_use]
    pub const fn with_port(mut self, port: u32) -> Self {
        self.port = port;
        self
    }

    /// Set both worker counts.
    #[must_use]
    pub const fn with_workers(mut self, workers: WorkerCount, task_workers: WorkerCount) -> Self {
        self.workers = workers;
        self.task_workers = task_workers;
        self
    }

    /// Set the per-worker request ceiling.
    #[must_use]
    pub const fn with_max_requests(mut self, max_requests: u64) -> Self {
        self.max_requests = max_requests;
        self
    }

    /// Set the application environment name.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Set the storage path.
    #[must_use]
    pub fn with_storage_path(mut self, storage_path: impl Into<PathBuf>) -> Self {
        self.storage_path = storage_path.into();
        self
    }
}
