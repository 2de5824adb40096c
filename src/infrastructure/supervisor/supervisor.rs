use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::error::{Result, SupervisorError};
use super::guard::ServiceGuard;
use super::process::{ProcessHandle, ServiceCommand};
use crate::domain::models::{LivenessState, ReadinessConfig, ServiceEndpoint};
use crate::domain::ports::{HealthProbe, ProbeError};

/// Timing of the readiness gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// Wall-clock budget for the service to come alive
    pub timeout: Duration,
    /// Fixed delay between probes
    pub poll_interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl From<&ReadinessConfig> for ReadinessPolicy {
    fn from(config: &ReadinessConfig) -> Self {
        Self {
            timeout: config.timeout(),
            poll_interval: config.poll_interval(),
        }
    }
}

#[derive(Debug, Default)]
struct LifecycleState {
    process: Option<ProcessHandle>,
    liveness: LivenessState,
}

/// Supervisor that resuscitates the annotation service when it is not available
///
/// Owns at most one spawned service process and guarantees, through
/// [`ServiceSupervisor::ensure_ready`], that the service answers its liveness
/// probe before a request is issued. Without a start command the service is
/// assumed to be managed externally and only health checks are performed.
///
/// Readiness checks are serialized; requests issued after the gate are not.
///
/// # Example
///
/// ```rust,no_run
/// use corenlp_client::domain::models::ServiceEndpoint;
/// use corenlp_client::infrastructure::supervisor::{HttpHealthProbe, ServiceSupervisor};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// let endpoint = ServiceEndpoint::parse("http://localhost:9000")?;
/// let probe = HttpHealthProbe::new(&endpoint, "/ping", Duration::from_secs(2))?;
/// let supervisor = Arc::new(ServiceSupervisor::new(endpoint, Arc::new(probe)));
///
/// supervisor.ensure_ready().await?;
/// # Ok(())
/// # }
/// ```
pub struct ServiceSupervisor {
    endpoint: ServiceEndpoint,
    start_command: Option<ServiceCommand>,
    stop_command: Option<ServiceCommand>,
    probe: Arc<dyn HealthProbe>,
    policy: ReadinessPolicy,
    quiet: bool,
    termination_grace: Duration,
    state: Mutex<LifecycleState>,
    gate: tokio::sync::Mutex<()>,
}

impl ServiceSupervisor {
    /// Create a supervisor for an externally managed service
    pub fn new(endpoint: ServiceEndpoint, probe: Arc<dyn HealthProbe>) -> Self {
        Self {
            endpoint,
            start_command: None,
            stop_command: None,
            probe,
            policy: ReadinessPolicy::default(),
            quiet: true,
            termination_grace: Duration::from_secs(5),
            state: Mutex::new(LifecycleState::default()),
            gate: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_start_command(mut self, command: ServiceCommand) -> Self {
        self.start_command = Some(command);
        self
    }

    #[must_use]
    pub fn with_stop_command(mut self, command: ServiceCommand) -> Self {
        self.stop_command = Some(command);
        self
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: ReadinessPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// How long a spawned process gets between SIGTERM and kill
    #[must_use]
    pub const fn with_termination_grace(mut self, grace: Duration) -> Self {
        self.termination_grace = grace;
        self
    }

    pub const fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    pub const fn policy(&self) -> ReadinessPolicy {
        self.policy
    }

    /// True when no start command is configured
    pub const fn is_externally_managed(&self) -> bool {
        self.start_command.is_none()
    }

    pub fn liveness(&self) -> Result<LivenessState> {
        Ok(self.state.lock()?.liveness)
    }

    /// Whether a spawned process is currently owned
    pub fn has_process(&self) -> Result<bool> {
        Ok(self.state.lock()?.process.is_some())
    }

    fn set_liveness(&self, liveness: LivenessState) -> Result<()> {
        self.state.lock()?.liveness = liveness;
        Ok(())
    }

    /// Spawn the service process if a start command is configured.
    ///
    /// No-op when a process is already owned or the service is externally
    /// managed.
    pub fn start(&self) -> Result<()> {
        let Some(command) = &self.start_command else {
            debug!(endpoint = %self.endpoint, "No start command; service is externally managed");
            return Ok(());
        };

        let mut state = self.state.lock()?;
        if state.process.is_some() {
            debug!(endpoint = %self.endpoint, "Service process already running");
            return Ok(());
        }

        state.process = Some(ProcessHandle::spawn(command, self.quiet)?);
        state.liveness = LivenessState::Starting;
        Ok(())
    }

    /// Terminate the spawned process, then run the stop command if configured.
    ///
    /// Always leaves the supervisor `Inactive`. Safe to call when nothing was
    /// started.
    pub async fn stop(&self) -> Result<()> {
        let process = {
            let mut state = self.state.lock()?;
            state.liveness = LivenessState::Inactive;
            state.process.take()
        };

        let terminated = match process {
            Some(process) => process.terminate(self.termination_grace).await,
            None => Ok(()),
        };

        if let Some(command) = &self.stop_command {
            info!(command = %command, "Running stop command");
            command.run().await?;
        }

        terminated
    }

    /// Synchronous stop used when a [`ServiceGuard`] is dropped without release.
    ///
    /// The stop command runs to completion on the calling thread. On a
    /// multi-threaded runtime the worker hands its other tasks off first
    /// through `block_in_place`; a current-thread runtime stays blocked until
    /// the command exits.
    pub(crate) fn stop_blocking(&self) {
        let process = match self.state.lock() {
            Ok(mut state) => {
                state.liveness = LivenessState::Inactive;
                state.process.take()
            }
            Err(_) => None,
        };

        if let Some(mut process) = process {
            if let Err(e) = process.kill_now() {
                warn!(error = %e, "Failed to kill service process");
            }
        }

        if let Some(command) = &self.stop_command {
            if let Err(e) = run_off_runtime(|| command.run_blocking()) {
                warn!(error = %e, "Stop command failed");
            }
        }
    }

    /// Start the service and return a guard that stops it when released or dropped
    pub fn scoped(self: &Arc<Self>) -> Result<ServiceGuard> {
        ServiceGuard::acquire(Arc::clone(self))
    }

    /// Probe the service once.
    ///
    /// Fails with [`SupervisorError::ShouldRetry`] when no connection could be
    /// established.
    pub async fn is_alive(&self) -> Result<bool> {
        self.probe.is_alive().await.map_err(|e| match e {
            ProbeError::Unreachable(msg) => SupervisorError::ShouldRetry(msg),
            ProbeError::Failed(msg) => SupervisorError::Probe(msg),
        })
    }

    /// Guarantee the service is reachable.
    ///
    /// An active service is probed once and returned immediately when healthy.
    /// Otherwise the process is (re)spawned if needed and the probe is polled at
    /// a fixed interval until it succeeds or the readiness timeout elapses, in
    /// which case [`SupervisorError::PermanentlyFailed`] is returned.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn ensure_ready(&self) -> Result<()> {
        let _gate = self.gate.lock().await;

        if self.liveness()?.is_active() {
            match self.is_alive().await {
                Ok(true) => return Ok(()),
                Ok(false) => warn!("Active service answered unhealthy, recovering"),
                Err(e) if e.should_retry() => warn!(error = %e, "Active service unreachable, recovering"),
                Err(e) => return Err(e),
            }
        }

        self.reap_exited()?;
        if !self.has_process()? {
            self.start()?;
        }
        self.set_liveness(LivenessState::Starting)?;

        match self.wait_until_alive().await {
            Ok(()) => {
                self.set_liveness(LivenessState::Active)?;
                info!("Service is ready");
                Ok(())
            }
            Err(e) => {
                self.set_liveness(LivenessState::Inactive)?;
                Err(e)
            }
        }
    }

    /// Drop the handle of a process that has exited so it can be respawned
    fn reap_exited(&self) -> Result<()> {
        let mut state = self.state.lock()?;
        let exited = match state.process.as_mut() {
            Some(process) => process.has_exited()?,
            None => false,
        };
        if exited {
            state.process = None;
        }
        Ok(())
    }

    async fn wait_until_alive(&self) -> Result<()> {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            match self.is_alive().await {
                Ok(true) => {
                    debug!(attempts, waited = ?started.elapsed(), "Liveness probe succeeded");
                    return Ok(());
                }
                Ok(false) => debug!(attempts, "Service answered unhealthy"),
                Err(e) if e.should_retry() => debug!(attempts, error = %e, "Service not reachable yet"),
                Err(e) => return Err(e),
            }

            let waited = started.elapsed();
            if waited < self.policy.timeout {
                tokio::time::sleep(self.policy.poll_interval).await;
            } else {
                warn!(attempts, waited = ?waited, "Timed out waiting for service to come alive");
                return Err(SupervisorError::PermanentlyFailed { waited });
            }
        }
    }
}

/// Run blocking work, moving the current worker's tasks elsewhere when the
/// runtime allows it
fn run_off_runtime<T>(work: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(work)
        }
        _ => work(),
    }
}

impl std::fmt::Debug for ServiceSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceSupervisor")
            .field("endpoint", &self.endpoint)
            .field("start_command", &self.start_command)
            .field("stop_command", &self.stop_command)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
