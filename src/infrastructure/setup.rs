//! Project initialization: config directory, default config file, database.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::config::{ConfigLoader, CONFIG_DIR};
use crate::adapters::sqlite::{initialize_database, PoolConfig};

/// Default configuration template content
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# tasktrack configuration
# Override settings by editing this file, adding .tasktrack/local.yaml, or
# setting environment variables with the TASKTRACK_ prefix, e.g.
#   export TASKTRACK_SERVER__PORT=9000
#   export TASKTRACK_CACHE__BACKEND=noop

database:
  # Path to the SQLite database file (relative to the project root)
  path: ".tasktrack/tasktrack.db"
  max_connections: 10

cache:
  # moka (in-process), redis (shared between processes) or noop (always
  # read the database)
  backend: "moka"
  redis_url: "redis://127.0.0.1:6379"
  connect_timeout_seconds: 5
  # Lifetime of every cached page and item
  ttl_seconds: 900
  max_capacity: 10000
  # Page size kept warm by writes; other sizes read the database directly
  default_page_size: 20
  max_page_size: 100
  # Serialize multi-page cache updates within this process
  serialize_page_writes: false
  # Backfill every page when the server starts
  warm_on_start: false

logging:
  # trace, debug, info, warn, error
  level: "info"
  # json or pretty
  format: "json"
  # Uncomment to also write rolling log files
  # log_dir: ".tasktrack/logs"
  rotation: "daily"

server:
  host: "127.0.0.1"
  port: 8080
  enable_cors: true
"#;

/// What `initialize_project` did.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InitReport {
    pub config_path: PathBuf,
    pub config_written: bool,
    pub database_path: PathBuf,
}

/// Create `.tasktrack/` under `root`, write the default config unless one
/// exists (or `force` is set) and create the migrated database.
pub async fn initialize_project(root: &Path, force: bool) -> Result<InitReport> {
    let dir = root.join(CONFIG_DIR);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let config_path = dir.join("config.yaml");
    let config_written = force || !config_path.exists();
    if config_written {
        fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }

    let config = ConfigLoader::load_from(root)?;
    let database_path = resolve_under(root, &config.database.path);
    let url = format!("sqlite:{}", database_path.display());
    let pool = initialize_database(&url, Some(PoolConfig::from(&config.database)))
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    tracing::info!(
        config = %config_path.display(),
        database = %database_path.display(),
        config_written,
        "project initialized"
    );

    Ok(InitReport {
        config_path,
        config_written,
        database_path,
    })
}

fn resolve_under(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path.strip_prefix("sqlite:").unwrap_or(path));
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
