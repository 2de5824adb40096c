use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::properties::Properties;

/// Main configuration structure for the CoreNLP client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Remote service and process lifecycle
    #[serde(default)]
    pub service: ServiceConfig,

    /// Readiness gate tuning
    #[serde(default)]
    pub readiness: ReadinessConfig,

    /// Annotation request defaults
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceConfig {
    /// Base URL of the annotation server
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Spawn the default CoreNLP launcher; a `start_command` spawns regardless
    #[serde(default)]
    pub start_server: bool,

    /// CoreNLP checkout containing `javanlp.sh` (falls back to `$JAVANLP_HOME`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corenlp_home: Option<PathBuf>,

    /// Explicit start command, tokenized shell-style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,

    /// Command run synchronously after the spawned process is terminated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_command: Option<String>,

    /// Per-request timeout the spawned server enforces, in milliseconds
    #[serde(default = "default_server_timeout_ms")]
    pub server_timeout_ms: u64,

    /// Discard the spawned server's stdout and stderr
    #[serde(default = "default_true")]
    pub quiet: bool,
}

fn default_endpoint() -> String {
    "http://localhost:9000".to_string()
}

const fn default_server_timeout_ms() -> u64 {
    5000
}

const fn default_true() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            start_server: false,
            corenlp_home: None,
            start_command: None,
            stop_command: None,
            server_timeout_ms: default_server_timeout_ms(),
            quiet: true,
        }
    }
}

/// Readiness gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReadinessConfig {
    /// Wall-clock budget for the service to come alive
    #[serde(default = "default_readiness_timeout_secs")]
    pub timeout_secs: u64,

    /// Fixed delay between liveness probes
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Path of the liveness endpoint
    #[serde(default = "default_probe_path")]
    pub probe_path: String,

    /// HTTP timeout of a single probe
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

const fn default_readiness_timeout_secs() -> u64 {
    15
}

const fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_probe_path() -> String {
    "/ping".to_string()
}

const fn default_probe_timeout_ms() -> u64 {
    2000
}

impl ReadinessConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_readiness_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            probe_path: default_probe_path(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

/// Annotation client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClientConfig {
    /// Annotators used when a call does not name its own
    #[serde(default = "default_annotators")]
    pub annotators: Vec<String>,

    /// Base properties merged under the per-call defaults
    #[serde(default)]
    pub properties: Properties,

    /// Overall HTTP timeout for annotation and query requests
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_annotators() -> Vec<String> {
    ["tokenize", "ssplit", "lemma", "pos", "ner", "depparse"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

const fn default_request_timeout_secs() -> u64 {
    60
}

impl ClientConfig {
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            annotators: default_annotators(),
            properties: Properties::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for log files (optional, if None logs only to stderr)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}
