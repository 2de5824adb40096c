//! corenlp-client - resilient client for a CoreNLP annotation server
//!
//! The crate keeps an annotation server usable from a long-running program:
//! it can launch a local server, wait for it to answer its liveness probe,
//! recover it after a crash, and stop it when the owning scope ends.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): configuration, endpoint and property models,
//!   match flattening, and the [`HealthProbe`] port
//! - **Infrastructure Layer** (`infrastructure`): the [`ServiceSupervisor`],
//!   the [`AnnotationClient`], config loading and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use corenlp_client::{AnnotationClient, ConfigLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let client = AnnotationClient::from_config(&config)?;
//!     let guard = client.supervisor().scoped()?;
//!
//!     let matches = client
//!         .semgrex("Chris wrote a simple sentence.", "{word:wrote} >nsubj {}=subject", false, false)
//!         .await?;
//!     println!("{:?}", matches.flatten(None)?);
//!
//!     guard.release().await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{
    flatten_matches, Config, IndexedWord, InputFormat, LivenessState, Properties, PropertyValue,
    QueryOutput, ServiceEndpoint,
};
pub use domain::ports::{HealthProbe, ProbeError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::corenlp::{AnnotationClient, AnnotationError};
pub use infrastructure::supervisor::{
    HttpHealthProbe, ReadinessPolicy, ServiceCommand, ServiceGuard, ServiceSupervisor,
    SupervisorError,
};
