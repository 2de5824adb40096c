//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Configuration validation
//! - Start-command resolution for spawned servers

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
