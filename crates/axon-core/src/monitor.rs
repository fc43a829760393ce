//! Supervised monitoring loop with adaptive backoff
//!
//! The monitor waits for the server to become ready, then polls health on a
//! schedule, invoking an injectable per-iteration hook while the server is
//! ready. Health blips in the steady state are transient: the loop backs off
//! and re-polls rather than terminating. Only cancellation stops it.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axon_config::MonitorConfig;
use tokio_util::sync::CancellationToken;

use crate::readiness::Readiness;
use crate::service::ChatService;

/// Lifecycle state of the monitor loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MonitorState {
    /// Polling readiness until the server can serve requests
    AwaitingReady = 0,
    /// Steady-state health polling
    Running = 1,
    /// Terminal; reached only through cancellation
    Stopped = 2,
}

impl MonitorState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::AwaitingReady,
            1 => Self::Running,
            _ => Self::Stopped,
        }
    }
}

/// Per-iteration extension point for the steady-state loop
///
/// Injected as a strategy rather than subclassed: callers supply their own
/// implementation for custom periodic work.
#[async_trait]
pub trait IterationHook: Send + Sync {
    /// Called once per poll while the server is ready
    ///
    /// An error is logged and treated as transient; it never stops the loop.
    async fn on_iteration(&self, service: &ChatService) -> anyhow::Result<()>;
}

/// Default hook: fetch and log a status snapshot
pub struct StatusLogHook;

#[async_trait]
impl IterationHook for StatusLogHook {
    async fn on_iteration(&self, service: &ChatService) -> anyhow::Result<()> {
        let status = service.server_status().await;
        tracing::info!(
            healthy = status.healthy,
            models = status.models.len(),
            current_model = ?status.current_model,
            "server status"
        );
        Ok(())
    }
}

/// Long-running readiness and health monitor
pub struct Monitor {
    service: ChatService,
    config: MonitorConfig,
    hook: Box<dyn IterationHook>,
    state: AtomicU8,
}

impl Monitor {
    /// Monitor with the default schedule and status-logging hook
    pub fn new(service: ChatService) -> Self {
        Self::with_config(service, MonitorConfig::default())
    }

    /// Monitor with an explicit schedule
    pub fn with_config(service: ChatService, config: MonitorConfig) -> Self {
        Self {
            service,
            config,
            hook: Box::new(StatusLogHook),
            state: AtomicU8::new(MonitorState::AwaitingReady as u8),
        }
    }

    /// Replace the per-iteration hook
    #[must_use]
    pub fn with_hook(mut self, hook: Box<dyn IterationHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> MonitorState {
        MonitorState::from_u8(self.state.load(Ordering::Relaxed))
    }

    /// Run until the token is cancelled
    ///
    /// Designed to run indefinitely under operator control; there is no
    /// retry-limit-triggered termination.
    pub async fn run(&self, shutdown: CancellationToken) {
        self.set_state(MonitorState::AwaitingReady);

        if self.await_ready(&shutdown).await {
            self.set_state(MonitorState::Running);
            tracing::info!("server ready, monitor entering steady-state polling");
            self.poll_loop(&shutdown).await;
        }

        self.set_state(MonitorState::Stopped);
        tracing::info!("monitor stopped");
    }

    fn set_state(&self, state: MonitorState) {
        self.state.store(state as u8, Ordering::Relaxed);
    }

    /// Poll readiness until the server is ready
    ///
    /// Returns `true` when ready, `false` when cancelled first. Identical
    /// consecutive verdicts are not re-logged.
    async fn await_ready(&self, shutdown: &CancellationToken) -> bool {
        let mut last: Option<Readiness> = None;

        loop {
            let verdict = self.service.check_readiness().await;
            if verdict.ready {
                return true;
            }

            if last.as_ref() != Some(&verdict) {
                tracing::info!(status = %verdict.status, "waiting for server readiness");
            }

            let delay = if verdict.server_healthy {
                Duration::from_secs(self.config.startup_no_models_seconds)
            } else {
                Duration::from_secs(self.config.startup_retry_seconds)
            };
            last = Some(verdict);

            tokio::select! {
                () = shutdown.cancelled() => return false,
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Steady-state loop: poll, run the hook while ready, back off otherwise
    async fn poll_loop(&self, shutdown: &CancellationToken) {
        loop {
            if shutdown.is_cancelled() {
                return;
            }

            let verdict = self.service.check_readiness().await;
            let delay = if verdict.ready {
                match self.hook.on_iteration(&self.service).await {
                    Ok(()) => Duration::from_secs(self.config.poll_interval_seconds),
                    Err(e) => {
                        tracing::warn!(error = %e, "monitor iteration failed; retrying");
                        Duration::from_secs(self.config.error_retry_seconds)
                    }
                }
            } else if verdict.server_healthy {
                tracing::warn!(status = %verdict.status, "server degraded");
                Duration::from_secs(self.config.degraded_retry_seconds)
            } else {
                tracing::warn!(status = %verdict.status, "server offline");
                Duration::from_secs(self.config.offline_retry_seconds)
            };

            tokio::select! {
                () = shutdown.cancelled() => return,
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
}
