//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment: defaults, project YAML files,
//! then environment variable overrides, validated after merging.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, CONFIG_DIR, ENV_PREFIX};
