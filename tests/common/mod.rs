//! Common test utilities for integration tests
//!
//! Provides scripted liveness probes and logging setup shared across
//! integration test files.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use corenlp_client::domain::models::ServiceEndpoint;
use corenlp_client::domain::ports::{HealthProbe, ProbeError};

/// One scripted probe answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ProbeStep {
    Alive,
    Unhealthy,
    Unreachable,
    Broken,
}

impl ProbeStep {
    fn answer(self) -> Result<bool, ProbeError> {
        match self {
            Self::Alive => Ok(true),
            Self::Unhealthy => Ok(false),
            Self::Unreachable => Err(ProbeError::Unreachable("connection refused".to_string())),
            Self::Broken => Err(ProbeError::Failed("malformed response".to_string())),
        }
    }
}

/// Probe that replays a script, then repeats a fallback answer forever
#[derive(Debug)]
pub struct ScriptedProbe {
    script: Mutex<VecDeque<ProbeStep>>,
    fallback: ProbeStep,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedProbe {
    pub fn new(script: impl IntoIterator<Item = ProbeStep>, fallback: ProbeStep) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn always(step: ProbeStep) -> Arc<Self> {
        Self::new([], step)
    }

    /// Unreachable `failures` times, then alive
    pub fn alive_after(failures: usize) -> Arc<Self> {
        Self::new(
            std::iter::repeat(ProbeStep::Unreachable).take(failures),
            ProbeStep::Alive,
        )
    }

    /// Queue more answers ahead of the fallback
    pub fn push(&self, steps: impl IntoIterator<Item = ProbeStep>) {
        self.script.lock().unwrap().extend(steps);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn is_alive(&self) -> Result<bool, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);
        step.answer()
    }
}

#[allow(dead_code)]
pub fn endpoint(url: &str) -> ServiceEndpoint {
    ServiceEndpoint::parse(url).expect("valid test endpoint")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
