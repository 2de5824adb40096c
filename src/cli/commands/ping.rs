//! Readiness check command.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::corenlp::AnnotationClient;

#[derive(Debug, Serialize)]
pub struct PingOutput {
    pub endpoint: String,
    pub liveness: String,
    pub externally_managed: bool,
}

impl CommandOutput for PingOutput {
    fn to_human(&self) -> String {
        format!("{} is {}", self.endpoint, self.liveness)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Bring the service up (if configured to) and report its liveness
pub async fn execute(client: &AnnotationClient, json: bool) -> Result<()> {
    let supervisor = client.supervisor();
    supervisor.ensure_ready().await?;

    let result = PingOutput {
        endpoint: supervisor.endpoint().to_string(),
        liveness: supervisor.liveness()?.to_string(),
        externally_managed: supervisor.is_externally_managed(),
    };
    output(&result, json);
    Ok(())
}
