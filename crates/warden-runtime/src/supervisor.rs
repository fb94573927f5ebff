//! Top-level composition of a supervised launch.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use warden_core::{
    InstanceProbe, LaunchOptions, ReportSink, ServerBackend, ServerStatePaths, ServerStopper,
    SupervisorError, SupervisorResult, resolve,
};

use crate::coordination::{PidFileProbe, StateFileStopper, write_pidfile};
use crate::handshake::write_handshake;
use crate::lifecycle::{
    ControllerOutcome, LifecycleController, LifecycleState, StopRequests, spawn_signal_worker,
    stop_channel,
};
use crate::process::Launcher;

/// Timing knobs for the supervision loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorSettings {
    /// Sleep between ticks while the server runs
    pub tick_interval: Duration,
    /// Time the server gets to exit after being signalled before it is killed
    pub grace_period: Duration,
}

impl SupervisorSettings {
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);
    pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            grace_period: Self::DEFAULT_GRACE_PERIOD,
        }
    }
}

/// Runs one supervised launch: preconditions, resolution, handshake, spawn,
/// then the lifecycle controller.
///
/// The liveness probe and stop collaborator default to the pid-file based
/// implementations for the server's storage path; tests swap in fakes.
pub struct Supervisor {
    backend: Arc<dyn ServerBackend>,
    launcher: Launcher,
    sink: Arc<dyn ReportSink>,
    probe: Option<Arc<dyn InstanceProbe>>,
    stopper: Option<Arc<dyn ServerStopper>>,
    settings: SupervisorSettings,
}

impl Supervisor {
    pub fn new(
        backend: Arc<dyn ServerBackend>,
        launcher: Launcher,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            backend,
            launcher,
            sink,
            probe: None,
            stopper: None,
            settings: SupervisorSettings::default(),
        }
    }

    /// Replace the liveness check consulted before launch.
    pub fn with_probe(mut self, probe: Arc<dyn InstanceProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Replace the stop collaborator invoked once the server has stopped.
    pub fn with_stopper(mut self, stopper: Arc<dyn ServerStopper>) -> Self {
        self.stopper = Some(stopper);
        self
    }

    pub const fn with_settings(mut self, settings: SupervisorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Launch and supervise the server, stopping it on SIGINT, SIGTERM or SIGHUP.
    ///
    /// Returns the supervisor's exit code. A child that exits non-zero on its
    /// own is reported as [`SupervisorError::ChildExited`].
    pub async fn run(&self, options: LaunchOptions) -> SupervisorResult<i32> {
        let (slot, requests) = stop_channel();
        let worker = spawn_signal_worker(slot)
            .map_err(|e| SupervisorError::io("Failed to install signal handlers", e))?;

        let result = self.run_until(options, requests).await;
        worker.abort();

        result.map(|outcome| outcome.exit_code)
    }

    /// Like [`run`](Self::run), with stop requests supplied by the caller.
    pub async fn run_until(
        &self,
        options: LaunchOptions,
        requests: StopRequests,
    ) -> SupervisorResult<ControllerOutcome> {
        let server = self.backend.name();

        // The check may shell out to the runtime
        let backend = Arc::clone(&self.backend);
        let installed = tokio::task::spawn_blocking(move || backend.is_installed())
            .await
            .map_err(|e| SupervisorError::Spawn(format!("installation check failed: {e}")))?;
        if !installed {
            return Err(SupervisorError::RuntimeMissing {
                backend: server.to_string(),
            });
        }

        let paths = ServerStatePaths::new(&options.storage_path, server);
        let probe = self
            .probe
            .clone()
            .unwrap_or_else(|| Arc::new(PidFileProbe::new(&paths)));
        if probe.is_running() {
            return Err(SupervisorError::AlreadyRunning {
                server: server.to_string(),
            });
        }

        let config = resolve(options, self.backend.as_ref())?;
        debug!(
            server,
            workers = config.worker_count,
            task_workers = config.task_worker_count,
            max_requests = config.max_requests,
            "resolved launch configuration"
        );

        // Nothing to stop yet, so a request here just abandons the launch
        if let Some(reason) = requests.pending() {
            info!(%reason, "startup cancelled before launch");
            return Ok(ControllerOutcome {
                status: None,
                exit_code: reason.exit_code(),
                stop_reason: Some(reason),
                transitions: vec![LifecycleState::Starting],
            });
        }

        write_handshake(&paths.state_file, &config)?;

        let handle = self
            .launcher
            .launch(&config, self.backend.entry_point(), &paths.state_file)?;

        if let Err(e) = write_pidfile(&paths.pid_file, handle.pid()) {
            warn!(
                path = %paths.pid_file.display(),
                error = %e,
                "failed to record server pid"
            );
        }

        self.sink
            .info(&format!("Server running on http://{}", config.bind_address()));
        self.sink.info("Press Ctrl+C to stop the server");

        let stopper = self
            .stopper
            .clone()
            .unwrap_or_else(|| Arc::new(StateFileStopper::new(&config.storage_path)));

        let outcome = LifecycleController::new(
            handle,
            Arc::clone(&self.sink),
            requests,
            stopper,
            server,
            self.settings,
        )
        .run()
        .await?;

        if outcome.stop_reason.is_none() && outcome.exit_code != 0 {
            return Err(SupervisorError::ChildExited {
                code: outcome.exit_code,
            });
        }

        Ok(outcome)
    }
}
