//! Wiring of repositories, cache store and services.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

use crate::adapters::cache::CacheProvider;
use crate::adapters::sqlite::{initialize_database, PoolConfig, SqliteDependencyRepository, SqliteTaskRepository};
use crate::domain::models::Config;
use crate::domain::ports::CacheStore;
use crate::services::{DependencyService, TaskService};

pub type AppTaskService = TaskService<SqliteTaskRepository, CacheProvider>;
pub type AppDependencyService = DependencyService<SqliteDependencyRepository, SqliteTaskRepository, CacheProvider>;

/// Everything a surface needs to serve requests.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub pool: SqlitePool,
    pub cache: Arc<CacheProvider>,
    pub tasks: Arc<AppTaskService>,
    pub dependencies: Arc<AppDependencyService>,
}

impl AppContext {
    /// Open the configured database, apply migrations and build the services.
    pub async fn open(config: Config) -> Result<Self> {
        let pool = initialize_database(&config.database.url(), Some(PoolConfig::from(&config.database)))
            .await
            .with_context(|| {
                format!(
                    "Failed to open database at {}. Run 'tasktrack init' first.",
                    config.database.path
                )
            })?;
        Ok(Self::from_pool(config, pool).await)
    }

    /// Build the services over an already migrated pool.
    pub async fn from_pool(config: Config, pool: SqlitePool) -> Self {
        let cache = Arc::new(CacheProvider::from_config(&config.cache).await);
        let task_repo = Arc::new(SqliteTaskRepository::new(pool.clone()));
        let dependency_repo = Arc::new(SqliteDependencyRepository::new(pool.clone()));

        let tasks = Arc::new(TaskService::new(task_repo.clone(), cache.clone(), &config.cache));
        let dependencies = Arc::new(DependencyService::new(
            dependency_repo,
            task_repo,
            cache.clone(),
            &config.cache,
        ));

        Self {
            config,
            pool,
            cache,
            tasks,
            dependencies,
        }
    }

    /// Backfill every default-size page of both record kinds.
    pub async fn warm_caches(&self) -> Result<(usize, usize)> {
        let task_pages = self.tasks.warm_cache().await.context("Failed to warm task pages")?;
        let dependency_pages = self
            .dependencies
            .warm_cache()
            .await
            .context("Failed to warm dependency pages")?;

        info!(
            provider = self.cache.provider_name(),
            task_pages, dependency_pages, "caches warmed"
        );
        Ok((task_pages, dependency_pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use crate::domain::models::TaskDraft;
    use chrono::Utc;

    #[tokio::test]
    async fn test_services_share_one_store() {
        let pool = create_migrated_test_pool().await.unwrap();
        let ctx = AppContext::from_pool(Config::default(), pool).await;

        let task = ctx.tasks.create_task(TaskDraft::new("a", "", Utc::now())).await.unwrap();
        assert!(ctx.cache.get(&format!("TaskItem_{}", task.id)).await.unwrap().is_some());
        assert_eq!(ctx.warm_caches().await.unwrap(), (0, 0));
    }
}
