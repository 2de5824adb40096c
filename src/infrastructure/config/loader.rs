use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::models::{Config, ServiceConfig, ServiceEndpoint};

/// Main class launched by the default start command
const SERVER_MAIN_CLASS: &str = "edu.stanford.nlp.pipeline.StanfordCoreNLPServer";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid service endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Endpoint '{0}' must be localhost when starting a server")]
    NonLocalEndpoint(String),

    #[error("Starting a server requires service.corenlp_home or $JAVANLP_HOME")]
    MissingCorenlpHome,

    #[error("Invalid readiness timeout: {0}s. Must be positive")]
    InvalidReadinessTimeout(u64),

    #[error("Invalid poll interval: {0}ms. Must be positive")]
    InvalidPollInterval(u64),

    #[error("Invalid probe path: '{0}'. Must start with '/'")]
    InvalidProbePath(String),

    #[error("Invalid request timeout: {0}s. Must be positive")]
    InvalidRequestTimeout(u64),

    #[error("Default annotator list cannot be empty")]
    EmptyAnnotators,

    #[error("Invalid default properties: {0}")]
    InvalidProperties(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. corenlp.yaml in the working directory
    /// 3. corenlp.local.yaml (local overrides, optional)
    /// 4. Environment variables (CORENLP_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("corenlp.yaml"))
            .merge(Yaml::file("corenlp.local.yaml"))
            .merge(Env::prefixed("CORENLP_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("CORENLP_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        ServiceEndpoint::parse(&config.service.endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(e.to_string()))?;

        if config.readiness.timeout_secs == 0 {
            return Err(ConfigError::InvalidReadinessTimeout(
                config.readiness.timeout_secs,
            ));
        }

        if config.readiness.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidPollInterval(
                config.readiness.poll_interval_ms,
            ));
        }

        if !config.readiness.probe_path.starts_with('/') {
            return Err(ConfigError::InvalidProbePath(
                config.readiness.probe_path.clone(),
            ));
        }

        if config.readiness.probe_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "readiness.probe_timeout_ms must be positive".to_string(),
            ));
        }

        if config.client.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidRequestTimeout(
                config.client.request_timeout_secs,
            ));
        }

        if config.client.annotators.is_empty() {
            return Err(ConfigError::EmptyAnnotators);
        }

        config
            .client
            .properties
            .input_format()
            .map_err(|e| ConfigError::InvalidProperties(e.to_string()))?;

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Self::resolve_start_command(&config.service)?;

        Ok(())
    }

    /// Command line that spawns the server, or `None` for an externally
    /// managed service.
    ///
    /// A configured `start_command` always enables supervision. Without one,
    /// `start_server` selects the CoreNLP launcher script under `corenlp_home`
    /// (or `$JAVANLP_HOME`) with the endpoint's port and the configured server
    /// timeout. Spawned servers run on this host, so the endpoint must be
    /// localhost either way.
    pub fn resolve_start_command(service: &ServiceConfig) -> Result<Option<String>, ConfigError> {
        if !service.start_server && service.start_command.is_none() {
            return Ok(None);
        }

        let endpoint = ServiceEndpoint::parse(&service.endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(e.to_string()))?;
        if !endpoint.is_localhost() {
            return Err(ConfigError::NonLocalEndpoint(service.endpoint.clone()));
        }

        if let Some(command) = &service.start_command {
            return Ok(Some(command.clone()));
        }

        let home = service
            .corenlp_home
            .clone()
            .or_else(|| std::env::var_os("JAVANLP_HOME").map(PathBuf::from))
            .ok_or(ConfigError::MissingCorenlpHome)?;

        let script = home.join("javanlp.sh");
        let script = script.to_string_lossy();
        let script = shlex::try_quote(&script)
            .map_err(|e| ConfigError::ValidationFailed(format!("Unquotable CoreNLP home: {e}")))?;

        Ok(Some(format!(
            "{script} {SERVER_MAIN_CLASS} -port {} -timeout {}",
            endpoint.port(),
            service.server_timeout_ms
        )))
    }
}
