use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;

use crate::domain::models::ServiceEndpoint;
use crate::domain::ports::{HealthProbe, ProbeError};

/// Liveness probe issuing `GET {endpoint}{path}`.
///
/// Any 2xx answer counts as alive. Failure to connect (including a connect
/// timeout) is reported as [`ProbeError::Unreachable`].
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    http_client: ReqwestClient,
    url: String,
}

impl HttpHealthProbe {
    pub fn new(endpoint: &ServiceEndpoint, path: &str, timeout: Duration) -> Result<Self, ProbeError> {
        let http_client = ReqwestClient::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ProbeError::Failed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            url: endpoint.join(path),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn is_alive(&self) -> Result<bool, ProbeError> {
        match self.http_client.get(&self.url).send().await {
            Ok(response) => {
                let status = response.status();
                tracing::trace!(url = %self.url, status = %status, "Liveness probe answered");
                Ok(status.is_success())
            }
            Err(e) if e.is_connect() => Err(ProbeError::Unreachable(e.to_string())),
            Err(e) => Err(ProbeError::Failed(e.to_string())),
        }
    }
}
