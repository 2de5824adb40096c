//! Port trait definitions (Hexagonal Architecture)
//!
//! - HealthProbe: liveness checks the supervisor polls before any request

pub mod health_probe;

pub use health_probe::{HealthProbe, ProbeError};
