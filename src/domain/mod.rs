//! Domain layer for the CoreNLP client
//!
//! Endpoint, liveness, property and query-result models, plus the port
//! traits infrastructure adapters implement.

pub mod models;
pub mod ports;
