//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or pretty console output on stderr
//! - Optional JSON log files with rotation

pub mod logger;

pub use logger::LoggerImpl;
