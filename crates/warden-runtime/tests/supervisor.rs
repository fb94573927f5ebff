//! End-to-end supervised launches with a shell script standing in for the server.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tempfile::TempDir;
use warden_core::{
    InstanceProbe, LaunchConfiguration, LaunchOptions, ServerBackend, ServerStatePaths,
    ServerStopper, SupervisorError, SupervisorResult, WorkerCount,
};
use warden_runtime::{
    CollectingSink, Launcher, LifecycleState, StopReason, Supervisor, SupervisorSettings,
    read_handshake, stop_channel,
};

/// Backend whose entry point is a shell script in the test's bin directory.
struct ShellBackend {
    installed: bool,
}

impl ServerBackend for ShellBackend {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn entry_point(&self) -> &'static str {
        "server"
    }

    fn is_installed(&self) -> bool {
        self.installed
    }

    fn cpu_count(&self) -> usize {
        4
    }

    fn default_options(&self, config: &LaunchConfiguration) -> Map<String, Value> {
        let mut options = Map::new();
        options.insert("worker_num".to_string(), json!(config.worker_count));
        options
    }
}

struct FixedProbe(bool);

impl InstanceProbe for FixedProbe {
    fn is_running(&self) -> bool {
        self.0
    }
}

#[derive(Default)]
struct RecordingStopper {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl ServerStopper for RecordingStopper {
    async fn stop(&self, server: &str) -> SupervisorResult<()> {
        self.calls.lock().unwrap().push(server.to_string());
        Ok(())
    }
}

/// Stop collaborator that can never clear the server state.
struct FailingStopper;

#[async_trait]
impl ServerStopper for FailingStopper {
    async fn stop(&self, _server: &str) -> SupervisorResult<()> {
        Err(SupervisorError::io(
            "Failed to clear server state",
            std::io::Error::other("denied"),
        ))
    }
}

/// Backend whose installation check blocks the calling thread for a while.
struct SlowCheckBackend;

impl ServerBackend for SlowCheckBackend {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn entry_point(&self) -> &'static str {
        "server"
    }

    fn is_installed(&self) -> bool {
        std::thread::sleep(Duration::from_millis(400));
        false
    }

    fn cpu_count(&self) -> usize {
        4
    }

    fn default_options(&self, _config: &LaunchConfiguration) -> Map<String, Value> {
        Map::new()
    }
}

struct Fixture {
    dir: TempDir,
    sink: Arc<CollectingSink>,
    stopper: Arc<RecordingStopper>,
}

impl Fixture {
    /// Application root with `storage/logs` and a `bin/server` script.
    fn new(script: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("storage/logs")).unwrap();
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin/server"), script).unwrap();

        Self {
            dir,
            sink: Arc::new(CollectingSink::new()),
            stopper: Arc::new(RecordingStopper::default()),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn paths(&self) -> ServerStatePaths {
        ServerStatePaths::new(self.root().join("storage"), "shell")
    }

    fn options(&self) -> LaunchOptions {
        LaunchOptions::new(self.root())
    }

    fn supervisor(&self, installed: bool, running: bool) -> Supervisor {
        Supervisor::new(
            Arc::new(ShellBackend { installed }),
            Launcher::new("sh", self.root().join("bin")),
            self.sink.clone(),
        )
        .with_probe(Arc::new(FixedProbe(running)))
        .with_stopper(self.stopper.clone())
        .with_settings(SupervisorSettings {
            tick_interval: Duration::from_millis(20),
            grace_period: Duration::from_millis(500),
        })
    }

    fn stop_calls(&self) -> Vec<String> {
        self.stopper.calls.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn auto_workers_are_resolved_into_handshake_before_spawn() {
    let fixture = Fixture::new("test -f \"$1\" && echo handshake-present\n");
    let options = fixture
        .options()
        .with_workers(WorkerCount::Auto, WorkerCount::Fixed(2))
        .with_max_requests(500);
    let (_slot, requests) = stop_channel();

    let outcome = fixture
        .supervisor(true, false)
        .run_until(options, requests)
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert!(fixture.sink.infos().contains(&"handshake-present".to_string()));

    let config = read_handshake(&fixture.paths().state_file).unwrap();
    assert_eq!(config.worker_count, 4);
    assert_eq!(config.task_worker_count, 2);
    assert_eq!(config.max_requests, 500);
    assert_eq!(config.default_server_options["worker_num"], json!(4));
}

#[tokio::test]
async fn already_running_refuses_launch_without_writing_state() {
    let fixture = Fixture::new("echo should-not-run\n");
    let (_slot, requests) = stop_channel();

    let err = fixture
        .supervisor(true, true)
        .run_until(fixture.options(), requests)
        .await
        .unwrap_err();

    assert!(matches!(err, SupervisorError::AlreadyRunning { .. }));
    assert_ne!(err.exit_code(), 0);
    assert!(!fixture.paths().state_file.exists());
    assert!(fixture.sink.messages().is_empty());
    assert!(fixture.stop_calls().is_empty());
}

#[tokio::test]
async fn missing_runtime_extension_is_reported() {
    let fixture = Fixture::new("exit 0\n");
    let (_slot, requests) = stop_channel();

    let err = fixture
        .supervisor(false, false)
        .run_until(fixture.options(), requests)
        .await
        .unwrap_err();

    assert!(matches!(err, SupervisorError::RuntimeMissing { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(!fixture.paths().state_file.exists());
}

#[tokio::test]
async fn invalid_port_aborts_before_handshake() {
    let fixture = Fixture::new("exit 0\n");
    let (_slot, requests) = stop_channel();

    let err = fixture
        .supervisor(true, false)
        .run_until(fixture.options().with_port(70_000), requests)
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 78);
    assert!(!fixture.paths().state_file.exists());
}

#[tokio::test]
async fn child_exit_code_is_propagated() {
    let fixture = Fixture::new("echo starting\nexit 137\n");
    let (_slot, requests) = stop_channel();

    let err = fixture
        .supervisor(true, false)
        .run_until(fixture.options(), requests)
        .await
        .unwrap_err();

    assert!(matches!(err, SupervisorError::ChildExited { code: 137 }));
    assert_eq!(err.exit_code(), 137);
    assert_eq!(
        fixture.sink.infos(),
        vec![
            "Server running on http://127.0.0.1:8000".to_string(),
            "Press Ctrl+C to stop the server".to_string(),
            "starting".to_string(),
        ]
    );
    // The stop collaborator runs even though nobody asked the server to stop
    assert_eq!(fixture.stop_calls(), vec!["shell".to_string()]);
}

#[tokio::test]
async fn interrupt_stops_child_and_finalizes() {
    let fixture = Fixture::new(
        "trap 'echo shutting-down; exit 0' INT\necho up\nwhile :; do sleep 0.05; done\n",
    );
    let (slot, requests) = stop_channel();
    let supervisor = fixture.supervisor(true, false);
    let options = fixture.options();

    let run = supervisor.run_until(options, requests);
    let interrupt = async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        slot.request(StopReason::Interrupt);
    };
    let (outcome, ()) = tokio::join!(run, interrupt);
    let outcome = outcome.unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.stop_reason, Some(StopReason::Interrupt));
    assert_eq!(
        outcome.transitions,
        vec![
            LifecycleState::Starting,
            LifecycleState::Running,
            LifecycleState::Stopping(StopReason::Interrupt),
            LifecycleState::Stopped,
        ]
    );
    assert!(fixture.sink.infos().contains(&"shutting-down".to_string()));
    assert_eq!(fixture.stop_calls(), vec!["shell".to_string()]);
}

#[tokio::test]
async fn child_ignoring_terminate_is_killed_after_grace() {
    let fixture = Fixture::new("trap '' TERM\nwhile :; do sleep 0.05; done\n");
    let (slot, requests) = stop_channel();
    let supervisor = fixture.supervisor(true, false);

    let run = supervisor.run_until(fixture.options(), requests);
    let terminate = async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        slot.request(StopReason::Terminate);
    };
    let (outcome, ()) = tokio::join!(run, terminate);
    let outcome = outcome.unwrap();

    assert_eq!(outcome.stop_reason, Some(StopReason::Terminate));
    assert_eq!(outcome.exit_code, 137);
    assert_eq!(fixture.stop_calls().len(), 1);
}

#[tokio::test]
async fn stop_requested_before_launch_cancels_startup() {
    let fixture = Fixture::new("echo should-not-run\n");
    let (slot, requests) = stop_channel();
    slot.request(StopReason::Terminate);

    let outcome = fixture
        .supervisor(true, false)
        .run_until(fixture.options(), requests)
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 143);
    assert_eq!(outcome.transitions, vec![LifecycleState::Starting]);
    assert!(!fixture.paths().state_file.exists());
    assert!(fixture.stop_calls().is_empty());
}

#[tokio::test]
async fn repeated_stderr_burst_is_collapsed() {
    let fixture = Fixture::new(
        "printf 'Connection refused\\nConnection refused\\nConnection refused\\n' >&2\n",
    );
    let (_slot, requests) = stop_channel();

    fixture
        .supervisor(true, false)
        .run_until(fixture.options(), requests)
        .await
        .unwrap();

    assert_eq!(
        fixture.sink.errors(),
        vec![
            "Connection refused".to_string(),
            "↑ 2 similar errors were reported.".to_string(),
        ]
    );
}

#[tokio::test]
async fn default_collaborators_clear_state_after_exit() {
    let fixture = Fixture::new("echo '{\"type\":\"request\",\"status\":200}'\n");
    let supervisor = Supervisor::new(
        Arc::new(ShellBackend { installed: true }),
        Launcher::new("sh", fixture.root().join("bin")),
        fixture.sink.clone(),
    )
    .with_settings(SupervisorSettings {
        tick_interval: Duration::from_millis(20),
        grace_period: Duration::from_millis(500),
    });
    let (_slot, requests) = stop_channel();

    let outcome = supervisor
        .run_until(fixture.options(), requests)
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(
        fixture.sink.structured_events(),
        vec![json!({"type": "request", "status": 200})]
    );
    let paths = fixture.paths();
    assert!(!paths.state_file.exists());
    assert!(!paths.pid_file.exists());
}

#[tokio::test]
async fn missing_runtime_executable_is_a_spawn_error() {
    let fixture = Fixture::new("exit 0\n");
    let supervisor = Supervisor::new(
        Arc::new(ShellBackend { installed: true }),
        Launcher::new(PathBuf::from("warden-no-such-runtime"), fixture.root().join("bin")),
        fixture.sink.clone(),
    )
    .with_probe(Arc::new(FixedProbe(false)));
    let (_slot, requests) = stop_channel();

    let err = supervisor
        .run_until(fixture.options(), requests)
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 71);
    // Left behind for diagnostics
    assert!(fixture.paths().state_file.exists());
}

#[tokio::test]
async fn stop_collaborator_failure_is_reported_without_changing_exit_code() {
    let fixture = Fixture::new("printf 'tail-no-newline' >&2\nexit 0\n");
    let (_slot, requests) = stop_channel();

    let outcome = fixture
        .supervisor(true, false)
        .with_stopper(Arc::new(FailingStopper))
        .run_until(fixture.options(), requests)
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.transitions.last(), Some(&LifecycleState::Stopped));
    assert_eq!(
        fixture.sink.errors(),
        vec![
            "tail-no-newline".to_string(),
            "Failed to clear server state: denied".to_string()
        ]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn installation_check_does_not_stall_other_tasks() {
    let fixture = Fixture::new("exit 0\n");
    let supervisor = Supervisor::new(
        Arc::new(SlowCheckBackend),
        Launcher::new("sh", fixture.root().join("bin")),
        fixture.sink.clone(),
    );
    let (_slot, requests) = stop_channel();

    let started = std::time::Instant::now();
    let ticker = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        started.elapsed()
    };
    let (result, ticked_after) = tokio::join!(
        supervisor.run_until(fixture.options(), requests),
        ticker
    );

    assert!(matches!(result, Err(SupervisorError::RuntimeMissing { .. })));
    assert!(ticked_after < Duration::from_millis(300));
}
