use std::ops::Deref;
use std::sync::Arc;

use super::error::Result;
use super::supervisor::ServiceSupervisor;

/// Scoped service lifetime: started on acquire, stopped on release.
///
/// Prefer [`ServiceGuard::release`], which awaits termination and reports
/// stop-command failures. If the guard is dropped instead (early return,
/// `?`, panic unwinding), the process is killed and the stop command run
/// synchronously; failures are only logged.
#[derive(Debug)]
pub struct ServiceGuard {
    supervisor: Arc<ServiceSupervisor>,
    released: bool,
}

impl ServiceGuard {
    /// Start the supervised service and tie its lifetime to the guard
    pub fn acquire(supervisor: Arc<ServiceSupervisor>) -> Result<Self> {
        supervisor.start()?;
        Ok(Self {
            supervisor,
            released: false,
        })
    }

    pub fn supervisor(&self) -> &Arc<ServiceSupervisor> {
        &self.supervisor
    }

    /// Stop the service and consume the guard
    pub async fn release(mut self) -> Result<()> {
        self.released = true;
        self.supervisor.stop().await
    }
}

impl Deref for ServiceGuard {
    type Target = ServiceSupervisor;

    fn deref(&self) -> &Self::Target {
        &self.supervisor
    }
}

impl Drop for ServiceGuard {
    fn drop(&mut self) {
        if !self.released {
            tracing::debug!(endpoint = %self.supervisor.endpoint(), "Service guard dropped, stopping service");
            self.supervisor.stop_blocking();
        }
    }
}
