use async_trait::async_trait;

/// Failure modes of a single liveness probe
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// No connection could be established; the service is not listening yet
    #[error("Service unreachable: {0}")]
    Unreachable(String),

    /// The probe reached the service but could not complete
    #[error("Probe failed: {0}")]
    Failed(String),
}

/// Port trait for liveness probing
///
/// Implementations answer whether the remote service is up:
/// - `Ok(true)` - the service answered healthy
/// - `Ok(false)` - the service answered, but not healthy
/// - `Err(ProbeError::Unreachable)` - nothing is listening yet (retryable)
/// - `Err(ProbeError::Failed)` - any other probe failure (non-retryable)
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn is_alive(&self) -> Result<bool, ProbeError>;
}
