//! Worker-server backend capability set.
//!
//! Each interchangeable worker-server implementation provides one of these.
//! The lifecycle controller and output multiplexer never look past it.

use serde_json::{Map, Value};

use crate::config::LaunchConfiguration;

/// Capabilities of a worker-server backend.
#[cfg_attr(test, mockall::automock)]
pub trait ServerBackend: Send + Sync {
    /// Short identifier, used for coordination file names and the stop collaborator.
    fn name(&self) -> &'static str;

    /// Name of the child's entry point inside the bin directory.
    fn entry_point(&self) -> &'static str;

    /// Whether the native runtime extension this backend needs is installed.
    fn is_installed(&self) -> bool;

    /// Number of logical CPUs available, used to resolve `auto` worker counts.
    fn cpu_count(&self) -> usize;

    /// Derive the backend's tuning options for a resolved configuration.
    ///
    /// Must be deterministic in the worker counts, request ceiling,
    /// environment and storage path.
    fn default_options(&self, config: &LaunchConfiguration) -> Map<String, Value>;
}
