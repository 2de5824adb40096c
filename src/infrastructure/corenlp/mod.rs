//! CoreNLP annotation client
//!
//! - `AnnotationClient` - readiness-gated annotation requests and pattern queries
//! - `codec` - length-delimited document encoding
//! - `AnnotationError` - caller-visible failure taxonomy

pub mod client;
pub mod codec;
pub mod error;
pub mod query;

pub use client::AnnotationClient;
pub use codec::{decode_delimited, encode_delimited};
pub use error::{AnnotationError, Result, TIMEOUT_MESSAGE};
