use anyhow::Context;
use prost::Message;
use reqwest::{header, Client as ReqwestClient, Response};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::codec::{decode_delimited, encode_delimited};
use super::error::{AnnotationError, Result};
use crate::domain::models::properties::{
    ANNOTATORS, INPUT_FORMAT, OUTPUT_FORMAT, PROTOBUF_SERIALIZER, SERIALIZER,
};
use crate::domain::models::{ClientConfig, Config, InputFormat, Properties, ServiceEndpoint};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::supervisor::{
    HttpHealthProbe, ReadinessPolicy, ServiceCommand, ServiceSupervisor,
};

/// Client for a CoreNLP annotation server
///
/// Every annotation request passes the supervisor's readiness gate first, then
/// posts the payload with the property mapping in the `properties` query
/// parameter. Responses are length-delimited documents.
///
/// Failures are classified into [`AnnotationError`]; nothing is retried here.
#[derive(Debug, Clone)]
pub struct AnnotationClient {
    http_client: ReqwestClient,
    supervisor: Arc<ServiceSupervisor>,
    default_annotators: Vec<String>,
    default_properties: Properties,
}

impl AnnotationClient {
    /// Create a client over an existing supervisor
    pub fn new(supervisor: Arc<ServiceSupervisor>, config: &ClientConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http_client,
            supervisor,
            default_annotators: config.annotators.clone(),
            default_properties: config.properties.clone(),
        })
    }

    /// Build the supervisor and client described by a loaded configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let endpoint = ServiceEndpoint::parse(&config.service.endpoint)
            .context("Invalid service endpoint")?;
        let probe = HttpHealthProbe::new(
            &endpoint,
            &config.readiness.probe_path,
            config.readiness.probe_timeout(),
        )
        .context("Failed to build liveness probe")?;

        let mut supervisor = ServiceSupervisor::new(endpoint, Arc::new(probe))
            .with_policy(ReadinessPolicy::from(&config.readiness))
            .with_quiet(config.service.quiet);

        if let Some(start) = ConfigLoader::resolve_start_command(&config.service)? {
            supervisor = supervisor.with_start_command(
                ServiceCommand::parse(&start).context("Invalid start command")?,
            );
        }
        if let Some(stop) = &config.service.stop_command {
            supervisor = supervisor
                .with_stop_command(ServiceCommand::parse(stop).context("Invalid stop command")?);
        }

        info!(
            endpoint = %supervisor.endpoint(),
            externally_managed = supervisor.is_externally_managed(),
            "Initializing CoreNLP client"
        );

        Self::new(Arc::new(supervisor), &config.client).context("Failed to build HTTP client")
    }

    pub const fn supervisor(&self) -> &Arc<ServiceSupervisor> {
        &self.supervisor
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        self.supervisor.endpoint()
    }

    pub(crate) const fn http_client(&self) -> &ReqwestClient {
        &self.http_client
    }

    /// Properties used when a call supplies none: the configured base
    /// properties overlaid with annotators, formats, and the protobuf serializer
    pub fn default_properties(&self, annotators: Option<&[String]>, input: InputFormat) -> Properties {
        let annotators = annotators.unwrap_or(self.default_annotators.as_slice()).join(",");

        let mut properties = self.default_properties.clone();
        properties.insert(ANNOTATORS, annotators);
        properties.insert(INPUT_FORMAT, input.as_str());
        properties.insert(OUTPUT_FORMAT, "serialized");
        properties.insert(SERIALIZER, PROTOBUF_SERIALIZER);
        properties
    }

    /// Annotate raw text and decode the resulting document
    pub async fn annotate<D>(
        &self,
        text: &str,
        annotators: Option<&[String]>,
        properties: Option<Properties>,
    ) -> Result<D>
    where
        D: Message + Default,
    {
        let properties =
            properties.unwrap_or_else(|| self.default_properties(annotators, InputFormat::Text));
        let body = self.request(text.as_bytes().to_vec(), &properties).await?;
        Ok(decode_delimited(body.as_slice())?)
    }

    /// Run further annotators over an already annotated document
    pub async fn update<D>(
        &self,
        doc: &D,
        annotators: Option<&[String]>,
        properties: Option<Properties>,
    ) -> Result<D>
    where
        D: Message + Default,
    {
        let properties = properties
            .unwrap_or_else(|| self.default_properties(annotators, InputFormat::Serialized));
        let body = self.request(encode_delimited(doc), &properties).await?;
        Ok(decode_delimited(body.as_slice())?)
    }

    /// Send one annotation request and return the raw response body.
    ///
    /// The content type follows `properties.inputFormat`; an unsupported value
    /// fails before the readiness gate or any network call.
    #[instrument(skip(self, payload, properties), fields(bytes = payload.len()))]
    pub async fn request(&self, payload: Vec<u8>, properties: &Properties) -> Result<Vec<u8>> {
        let input_format = properties.input_format()?;
        let query = properties.to_query_value()?;

        self.supervisor.ensure_ready().await?;

        debug!(
            url = %self.endpoint(),
            input_format = input_format.as_str(),
            "POST annotation request"
        );

        let response = self
            .http_client
            .post(self.endpoint().as_str())
            .query(&[("properties", query.as_str())])
            .header(header::CONTENT_TYPE, input_format.content_type())
            .body(payload)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        debug!(response_bytes = body.len(), "Annotation request succeeded");
        Ok(body.to_vec())
    }

    /// Pass 2xx responses through; classify everything else
    pub(crate) async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());
        warn!(status = %status, body = %body, "Annotation server returned an error");
        Err(AnnotationError::from_response(status, body))
    }
}
