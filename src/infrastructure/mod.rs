//! Infrastructure layer module
//!
//! Adapters for everything outside the process:
//! - Service supervision (process lifecycle, liveness probing, readiness gate)
//! - CoreNLP HTTP client and document codec
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod corenlp;
pub mod logging;
pub mod supervisor;
