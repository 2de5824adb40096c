use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while supervising the annotation service
///
/// `ShouldRetry` never escapes `ServiceSupervisor::ensure_ready`; the readiness
/// gate absorbs it while polling.
#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Service not reachable yet: {0}")]
    ShouldRetry(String),

    #[error("Timed out waiting for service to come alive after {waited:?}")]
    PermanentlyFailed { waited: Duration },

    #[error("Liveness probe failed: {0}")]
    Probe(String),

    #[error("Invalid service command '{0}'")]
    InvalidCommand(String),

    #[error("Failed to spawn service process: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to terminate service process: {source}")]
    Terminate {
        #[source]
        source: std::io::Error,
    },

    #[error("Stop command '{command}' exited with {status}")]
    StopCommandFailed { command: String, status: ExitStatus },

    #[error("Failed to run stop command '{command}': {source}")]
    StopCommandIo {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock poisoned")]
    LockPoisoned,
}

impl SupervisorError {
    /// True only for the internal "try again" signal
    pub const fn should_retry(&self) -> bool {
        matches!(self, Self::ShouldRetry(_))
    }
}

impl<T> From<std::sync::PoisonError<T>> for SupervisorError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

/// Result type alias for supervisor operations
pub type Result<T> = std::result::Result<T, SupervisorError>;
