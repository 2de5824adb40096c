//! Service supervision
//!
//! Owns the lifecycle of one external annotation server process and gates
//! requests on its readiness:
//! - `ServiceSupervisor` - start/stop, liveness probing, readiness gate
//! - `ServiceGuard` - scoped start-on-acquire / stop-on-release
//! - `HttpHealthProbe` - `GET /ping` liveness probe
//! - `ServiceCommand` / `ProcessHandle` - command tokenizing and child ownership

pub mod error;
pub mod guard;
pub mod probe;
pub mod process;
#[allow(clippy::module_inception)]
pub mod supervisor;

pub use error::{Result, SupervisorError};
pub use guard::ServiceGuard;
pub use probe::HttpHealthProbe;
pub use process::{ProcessHandle, ServiceCommand};
pub use supervisor::{ReadinessPolicy, ServiceSupervisor};
