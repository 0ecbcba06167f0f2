//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

use tasktrack::adapters::cache::MokaCacheStore;
use tasktrack::adapters::sqlite::{create_migrated_test_pool, SqliteTaskRepository};
use tasktrack::domain::models::{CacheConfig, Config, TaskDraft};
use tasktrack::infrastructure::AppContext;

/// Setup test logging
///
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Config with a small default page size so chains span several pages.
pub fn small_page_config(page_size: usize) -> Config {
    Config {
        cache: CacheConfig {
            default_page_size: page_size,
            ..CacheConfig::default()
        },
        ..Config::default()
    }
}

/// Application context over a fresh in-memory database.
pub async fn test_context(config: Config) -> AppContext {
    let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
    AppContext::from_pool(config, pool).await
}

/// Task repository and an isolated moka store over a fresh database.
pub async fn task_fixture() -> (Arc<SqliteTaskRepository>, Arc<MokaCacheStore>) {
    let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
    (
        Arc::new(SqliteTaskRepository::new(pool)),
        Arc::new(MokaCacheStore::new(10_000, Duration::from_secs(60))),
    )
}

pub fn draft(title: &str) -> TaskDraft {
    TaskDraft::new(title, "", Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap())
}

/// Seed `n` tasks through the service so every cached page is maintained.
pub async fn seed_tasks(ctx: &AppContext, n: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let task = ctx
            .tasks
            .create_task(draft(&format!("task {i}")))
            .await
            .expect("Failed to seed task");
        ids.push(task.id);
    }
    ids
}
