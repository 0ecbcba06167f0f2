use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Directory holding project-local configuration and data.
pub const CONFIG_DIR: &str = ".tasktrack";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "TASKTRACK_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid cache backend: {0}. Must be one of: moka, redis, noop")]
    InvalidCacheBackend(String),

    #[error("Redis URL must start with redis:// or rediss://, got: {0}")]
    InvalidRedisUrl(String),

    #[error("Invalid cache connect_timeout_seconds: {0}. Must be at least 1")]
    InvalidConnectTimeout(u64),

    #[error("Invalid cache ttl_seconds: {0}. Must be at least 1")]
    InvalidTtl(u64),

    #[error("Invalid page size: {0}. Must be at least 1")]
    InvalidPageSize(usize),

    #[error("default_page_size ({default}) cannot exceed max_page_size ({max})")]
    PageSizeAboveMax { default: usize, max: usize },

    #[error("Invalid server port: {0}")]
    InvalidPort(u16),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration relative to the current directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `.tasktrack/config.yaml` (created by `tasktrack init`)
    /// 3. `.tasktrack/local.yaml` (optional local overrides)
    /// 4. `TASKTRACK_*` environment variables, `__` separating sections
    pub fn load() -> Result<Config> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration rooted at `base` instead of the current directory.
    pub fn load_from(base: &Path) -> Result<Config> {
        let dir = base.join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        if !["json", "pretty"].contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }
        if !["daily", "hourly", "never"].contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        let cache = &config.cache;
        if !["moka", "redis", "noop"].contains(&cache.backend.as_str()) {
            return Err(ConfigError::InvalidCacheBackend(cache.backend.clone()));
        }
        if cache.backend == "redis" {
            if !(cache.redis_url.starts_with("redis://") || cache.redis_url.starts_with("rediss://")) {
                return Err(ConfigError::InvalidRedisUrl(cache.redis_url.clone()));
            }
            if cache.connect_timeout_seconds == 0 {
                return Err(ConfigError::InvalidConnectTimeout(0));
            }
        }
        if cache.ttl_seconds == 0 {
            return Err(ConfigError::InvalidTtl(cache.ttl_seconds));
        }
        if cache.default_page_size == 0 {
            return Err(ConfigError::InvalidPageSize(cache.default_page_size));
        }
        if cache.default_page_size > cache.max_page_size {
            return Err(ConfigError::PageSizeAboveMax {
                default: cache.default_page_size,
                max: cache.max_page_size,
            });
        }

        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.database.path, ".tasktrack/tasktrack.db");
        assert_eq!(config.cache.ttl_seconds, 900);
        assert_eq!(config.cache.default_page_size, 20);
        ConfigLoader::validate(&config).expect("default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
database:
  path: /custom/path.db
  max_connections: 5
cache:
  backend: noop
  default_page_size: 10
logging:
  level: debug
  format: pretty
";
        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");
        assert_eq!(config.database.path, "/custom/path.db");
        assert_eq!(config.cache.backend, "noop");
        assert_eq!(config.cache.default_page_size, 10);
        assert_eq!(config.cache.max_page_size, 100);
        assert_eq!(config.logging.format, "pretty");
        ConfigLoader::validate(&config).expect("parsed config should be valid");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidLogLevel(_))));

        let mut config = Config::default();
        config.cache.backend = "memcached".to_string();
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidCacheBackend(_))));

        let mut config = Config::default();
        config.cache.backend = "redis".to_string();
        config.cache.redis_url = "localhost:6379".to_string();
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidRedisUrl(_))));

        let mut config = Config::default();
        config.cache.backend = "redis".to_string();
        config.cache.connect_timeout_seconds = 0;
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidConnectTimeout(0))));

        let mut config = Config::default();
        config.cache.ttl_seconds = 0;
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidTtl(0))));

        let mut config = Config::default();
        config.cache.default_page_size = 500;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::PageSizeAboveMax { default: 500, max: 100 })
        ));

        let mut config = Config::default();
        config.database.path = String::new();
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::EmptyDatabasePath)));

        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidPort(0))));
    }

    #[test]
    fn test_files_and_env_merge_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.yaml"),
            "cache:\n  default_page_size: 5\n  ttl_seconds: 60\nserver:\n  port: 9000\n",
        )
        .unwrap();
        fs::write(dir.join("local.yaml"), "cache:\n  ttl_seconds: 30\n").unwrap();

        temp_env::with_vars(
            [
                ("TASKTRACK_SERVER__PORT", Some("9100")),
                ("TASKTRACK_CACHE__SERIALIZE_PAGE_WRITES", Some("true")),
                ("TASKTRACK_CACHE__BACKEND", Some("redis")),
                ("TASKTRACK_CACHE__REDIS_URL", Some("redis://cache.internal:6380/2")),
            ],
            || {
                let config = ConfigLoader::load_from(temp.path()).unwrap();
                assert_eq!(config.cache.default_page_size, 5);
                assert_eq!(config.cache.ttl_seconds, 30);
                assert!(config.cache.serialize_page_writes);
                assert_eq!(config.cache.backend, "redis");
                assert_eq!(config.cache.redis_url, "redis://cache.internal:6380/2");
                assert_eq!(config.server.port, 9100);
            },
        );
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bad.yaml");
        fs::write(&path, "logging:\n  format: xml\n").unwrap();
        assert!(ConfigLoader::load_from_file(&path).is_err());
    }
}
