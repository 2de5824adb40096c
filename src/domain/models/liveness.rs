use serde::{Deserialize, Serialize};
use std::fmt;

/// Readiness of the supervised service as last observed by the supervisor.
///
/// Only `ServiceSupervisor::ensure_ready` moves the state forward;
/// `stop` resets it to `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LivenessState {
    /// Never confirmed reachable, or stopped
    #[default]
    Inactive,
    /// Waiting for the first successful probe
    Starting,
    /// Last probe answered healthy
    Active,
}

impl LivenessState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for LivenessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inactive => "inactive",
            Self::Starting => "starting",
            Self::Active => "active",
        };
        f.write_str(s)
    }
}
