//! The supervision loop.

use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};
use warden_core::{ReportSink, ServerStopper, SupervisorError, SupervisorResult};

use super::signals::{StopReason, StopRequests};
use super::state::LifecycleState;
use crate::output::OutputMultiplexer;
use crate::process::{ProcessHandle, exit_code_of};
use crate::supervisor::SupervisorSettings;

/// How long to wait for the output pipes to close after the child exits.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Result of a completed supervision run.
#[derive(Debug)]
pub struct ControllerOutcome {
    /// Final exit status of the child, if it could be reaped
    pub status: Option<ExitStatus>,
    /// The child's status as a supervisor exit code
    pub exit_code: i32,
    /// The stop request that ended the run, if the child did not exit on its own
    pub stop_reason: Option<StopReason>,
    /// Every state the controller passed through, in order
    pub transitions: Vec<LifecycleState>,
}

/// Drives one launched child from `Starting` to `Stopped`.
///
/// Sole owner of the [`ProcessHandle`]. Draining, polling and signalling all
/// happen sequentially inside [`run`](Self::run), so they never overlap.
pub struct LifecycleController {
    handle: ProcessHandle,
    multiplexer: OutputMultiplexer,
    sink: Arc<dyn ReportSink>,
    requests: StopRequests,
    stopper: Arc<dyn ServerStopper>,
    server: String,
    settings: SupervisorSettings,
    state: LifecycleState,
    transitions: Vec<LifecycleState>,
}

impl LifecycleController {
    pub fn new(
        handle: ProcessHandle,
        sink: Arc<dyn ReportSink>,
        requests: StopRequests,
        stopper: Arc<dyn ServerStopper>,
        server: impl Into<String>,
        settings: SupervisorSettings,
    ) -> Self {
        Self {
            handle,
            multiplexer: OutputMultiplexer::new(),
            sink,
            requests,
            stopper,
            server: server.into(),
            settings,
            state: LifecycleState::Starting,
            transitions: vec![LifecycleState::Starting],
        }
    }

    /// Current state
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Supervise the child until it exits or a stop is requested and carried out.
    ///
    /// Only process-status failures are errors; the child's own exit code is
    /// part of the outcome. The run always ends in `Stopped` with the stop
    /// collaborator invoked, even when such a failure cuts supervision short.
    pub async fn run(mut self) -> SupervisorResult<ControllerOutcome> {
        self.transition(LifecycleState::Running);

        let mut stop_reason = None;
        let result = self.drive(&mut stop_reason).await;
        if let Err(e) = &result {
            warn!(pid = %self.handle.pid(), error = %e, "supervision failed; finalizing");
        }

        let outcome = self.finalize(stop_reason).await;
        result.map(|()| outcome)
    }

    async fn drive(&mut self, stop_reason: &mut Option<StopReason>) -> SupervisorResult<()> {
        *stop_reason = self.supervise().await?;

        if let Some(reason) = *stop_reason {
            self.transition(LifecycleState::Stopping(reason));
            self.stop_child(reason).await?;
        }
        Ok(())
    }

    /// Tick until the child exits (`None`) or a stop is requested.
    async fn supervise(&mut self) -> SupervisorResult<Option<StopReason>> {
        loop {
            self.multiplexer.drain(&mut self.handle, self.sink.as_ref());

            if let Some(status) = self.poll_child()? {
                debug!(pid = %self.handle.pid(), %status, "server process exited");
                return Ok(None);
            }

            if let Some(reason) = self.requests.pending() {
                return Ok(Some(reason));
            }

            tokio::select! {
                () = sleep(self.settings.tick_interval) => {}
                reason = self.requests.wait() => return Ok(Some(reason)),
            }
        }
    }

    /// Forward the stop to the child, drain until it exits, kill it after the
    /// grace period.
    async fn stop_child(&mut self, reason: StopReason) -> SupervisorResult<()> {
        let pid = self.handle.pid();
        let deadline = Instant::now() + self.settings.grace_period;

        info!(%pid, %reason, "stopping server process");
        if let Err(e) = self.handle.signal(reason.child_signal()) {
            warn!(%pid, error = %e, "failed to signal server process");
        }

        loop {
            self.multiplexer.drain(&mut self.handle, self.sink.as_ref());

            if self.poll_child()?.is_some() {
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            sleep(self.settings.tick_interval.min(deadline - now)).await;
        }

        warn!(
            %pid,
            grace_secs = self.settings.grace_period.as_secs_f64(),
            "server did not exit within grace period; killing"
        );
        self.handle
            .kill()
            .await
            .map_err(|e| SupervisorError::io(format!("Failed to kill server process {pid}"), e))?;
        Ok(())
    }

    async fn finalize(mut self, stop_reason: Option<StopReason>) -> ControllerOutcome {
        self.handle.wait_for_readers(READER_DRAIN_TIMEOUT).await;
        self.multiplexer.drain(&mut self.handle, self.sink.as_ref());
        self.multiplexer.finish(self.sink.as_ref());

        let status = self.handle.exit_status();
        self.transition(LifecycleState::Stopped);

        // Idempotent, so this is safe even when the child exited on its own
        if let Err(e) = self.stopper.stop(&self.server).await {
            warn!(server = %self.server, error = %e, "failed to clear server state");
            self.sink.error(&e.to_string());
        }

        let exit_code = status.map_or(1, exit_code_of);
        info!(server = %self.server, exit_code, "server stopped");

        ControllerOutcome {
            status,
            exit_code,
            stop_reason,
            transitions: self.transitions,
        }
    }

    fn poll_child(&mut self) -> SupervisorResult<Option<ExitStatus>> {
        self.handle
            .try_wait()
            .map_err(|e| SupervisorError::io("Failed to check server process status", e))
    }

    fn transition(&mut self, next: LifecycleState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid lifecycle transition {} -> {next}",
            self.state
        );
        debug!(from = %self.state, to = %next, "lifecycle transition");
        self.state = next;
        self.transitions.push(next);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::lifecycle::stop_channel;
    use crate::output::CollectingSink;
    use async_trait::async_trait;
    use std::process::Stdio;
    use std::sync::Mutex;
    use tokio::process::Command;

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

    fn spawn_sh(script: &str) -> ProcessHandle {
        let child = Command::new("sh")
            .arg("-c")
            .arg(script)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn sh");
        ProcessHandle::new(child).expect("no PID")
    }

    fn fast_settings() -> SupervisorSettings {
        SupervisorSettings {
            tick_interval: Duration::from_millis(20),
            grace_period: Duration::from_millis(300),
        }
    }

    #[tokio::test]
    async fn child_exit_goes_straight_to_stopped() {
        let sink = Arc::new(CollectingSink::new());
        let stopper = Arc::new(RecordingStopper::default());
        let (_slot, requests) = stop_channel();

        let controller = LifecycleController::new(
            spawn_sh("echo booting; exit 137"),
            sink.clone(),
            requests,
            stopper.clone(),
            "swoole",
            fast_settings(),
        );
        let outcome = controller.run().await.unwrap();

        assert_eq!(outcome.exit_code, 137);
        assert_eq!(outcome.stop_reason, None);
        assert_eq!(
            outcome.transitions,
            vec![
                LifecycleState::Starting,
                LifecycleState::Running,
                LifecycleState::Stopped
            ]
        );
        assert_eq!(sink.infos(), vec!["booting".to_string()]);
        assert_eq!(*stopper.calls.lock().unwrap(), vec!["swoole".to_string()]);
    }

    #[tokio::test]
    async fn stop_request_signals_child_and_drains_shutdown_output() {
        let sink = Arc::new(CollectingSink::new());
        let stopper = Arc::new(RecordingStopper::default());
        let (slot, requests) = stop_channel();

        let handle = spawn_sh("trap 'echo draining; exit 0' TERM; echo ready; while :; do sleep 0.05; done");
        let controller = LifecycleController::new(
            handle,
            sink.clone(),
            requests,
            stopper.clone(),
            "swoole",
            fast_settings(),
        );

        let run = tokio::spawn(controller.run());
        tokio::time::sleep(Duration::from_millis(200)).await;
        slot.request(StopReason::Terminate);
        let outcome = run.await.unwrap().unwrap();

        assert_eq!(outcome.stop_reason, Some(StopReason::Terminate));
        assert_eq!(outcome.exit_code, 0);
        assert!(
            outcome
                .transitions
                .contains(&LifecycleState::Stopping(StopReason::Terminate))
        );
        assert_eq!(outcome.transitions.last(), Some(&LifecycleState::Stopped));
        assert_eq!(sink.infos(), vec!["ready".to_string(), "draining".to_string()]);
        assert_eq!(stopper.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn child_ignoring_signal_is_killed_after_grace_period() {
        let sink = Arc::new(CollectingSink::new());
        let (slot, requests) = stop_channel();
        slot.request(StopReason::Interrupt);

        let handle = spawn_sh("trap '' INT TERM; while :; do sleep 0.05; done");
        let controller = LifecycleController::new(
            handle,
            sink,
            requests,
            Arc::new(RecordingStopper::default()),
            "swoole",
            fast_settings(),
        );

        let started = std::time::Instant::now();
        let outcome = controller.run().await.unwrap();

        assert_eq!(outcome.stop_reason, Some(StopReason::Interrupt));
        assert_eq!(outcome.exit_code, 137);
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn status_check_failure_still_clears_server_state() {
        use nix::sys::wait::waitpid;
        use nix::unistd::Pid;

        let sink = Arc::new(CollectingSink::new());
        let stopper = Arc::new(RecordingStopper::default());
        let (_slot, requests) = stop_channel();

        // Reap the child behind the handle's back so its status check fails
        let handle = spawn_sh("echo gone; exit 3");
        let pid = Pid::from_raw(i32::try_from(handle.pid()).unwrap());
        waitpid(pid, None).unwrap();

        let controller = LifecycleController::new(
            handle,
            sink.clone(),
            requests,
            stopper.clone(),
            "swoole",
            fast_settings(),
        );
        let err = controller.run().await.unwrap_err();

        assert!(matches!(err, SupervisorError::Io { .. }));
        assert_eq!(err.exit_code(), 74);
        assert_eq!(*stopper.calls.lock().unwrap(), vec!["swoole".to_string()]);
        assert_eq!(sink.infos(), vec!["gone".to_string()]);
    }
}
