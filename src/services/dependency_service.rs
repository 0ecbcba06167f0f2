//! Dependency service: edge CRUD guarded against duplicates and cycles.

use std::sync::Arc;

use tracing::{debug, info};

use super::cycle_guard::CycleGuard;
use super::paged_cache::PagedCache;
use super::pagination::PagePolicy;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CacheConfig, DependencyDraft, TaskDependency};
use crate::domain::ports::{CacheStore, DependencyRepository, TaskRepository};

/// Dependency edges over repository `D`, checked against tasks in `T`, cached in `C`.
pub struct DependencyService<D, T, C> {
    repo: Arc<D>,
    tasks: Arc<T>,
    cache: PagedCache<TaskDependency, D, C>,
    paging: PagePolicy,
}

impl<D, T, C> DependencyService<D, T, C>
where
    D: DependencyRepository + 'static,
    T: TaskRepository + 'static,
    C: CacheStore + 'static,
{
    /// Service whose page cache follows `config`.
    pub fn new(repo: Arc<D>, tasks: Arc<T>, store: Arc<C>, config: &CacheConfig) -> Self {
        let cache = PagedCache::new(repo.clone(), store)
            .with_ttl(config.ttl())
            .with_chain_lock(config.serialize_page_writes);
        Self {
            repo,
            tasks,
            cache,
            paging: PagePolicy::from(config),
        }
    }

    /// One page of edges, newest first.
    pub async fn list_dependencies(
        &self,
        page_index: Option<usize>,
        page_size: Option<usize>,
    ) -> DomainResult<Vec<TaskDependency>> {
        let (index, size) = self.paging.resolve(page_index, page_size)?;
        if self.paging.is_cached(size) {
            return self.cache.get_page(index, size).await;
        }

        debug!(page = index, page_size = size, "uncached page size, reading dependencies from database");
        self.repo.list_page(PagePolicy::offset(index, size)?, size as u64).await
    }

    /// One edge, read through the item cache.
    pub async fn get_dependency(&self, id: i64) -> DomainResult<TaskDependency> {
        self.cache.get_one(id).await
    }

    /// Edges leaving task `task_id`.
    pub async fn dependencies_of(&self, task_id: i64) -> DomainResult<Vec<TaskDependency>> {
        if self.tasks.get(task_id).await?.is_none() {
            return Err(DomainError::TaskNotFound(task_id));
        }
        self.repo.list_edges(Some(task_id)).await
    }

    /// Add an edge after the endpoint, duplicate and cycle checks.
    pub async fn create_dependency(&self, draft: DependencyDraft) -> DomainResult<TaskDependency> {
        self.ensure_endpoints(&draft).await?;

        let edges = self.repo.list_edges(None).await?;
        CycleGuard::new(edges).check(draft.task_id, draft.dependent_task_id, None)?;

        let dependency = self.repo.insert(&draft).await?;
        self.cache.insert_front(dependency, self.paging.default_size).await;

        info!(
            dependency_id = dependency.id,
            task_id = dependency.task_id,
            dependent_task_id = dependency.dependent_task_id,
            "dependency created"
        );
        Ok(dependency)
    }

    /// Re-point edge `id` at new endpoints.
    pub async fn update_dependency(&self, id: i64, draft: DependencyDraft) -> DomainResult<TaskDependency> {
        if self.repo.get(id).await?.is_none() {
            return Err(DomainError::DependencyNotFound(id));
        }
        self.ensure_endpoints(&draft).await?;

        let edges = self.repo.list_edges(None).await?;
        CycleGuard::without(edges, id).check(draft.task_id, draft.dependent_task_id, Some(id))?;

        let dependency = TaskDependency::new(id, draft.task_id, draft.dependent_task_id);
        self.repo.update(&dependency).await?;
        self.cache.update_one(dependency, self.paging.default_size).await;

        info!(dependency_id = id, "dependency updated");
        Ok(dependency)
    }

    /// Remove edge `id` from the database and the page chain.
    pub async fn delete_dependency(&self, id: i64) -> DomainResult<()> {
        self.repo.delete(id).await?;
        self.cache.delete_one(id, self.paging.default_size).await;

        info!(dependency_id = id, "dependency deleted");
        Ok(())
    }

    /// Backfill every uncached page of the default size.
    pub async fn warm_cache(&self) -> DomainResult<usize> {
        self.cache.warm(self.paging.default_size).await
    }

    async fn ensure_endpoints(&self, draft: &DependencyDraft) -> DomainResult<()> {
        for task_id in [draft.task_id, draft.dependent_task_id] {
            if self.tasks.get(task_id).await?.is_none() {
                return Err(DomainError::ValidationFailed(format!("task {task_id} does not exist")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::MokaCacheStore;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteDependencyRepository, SqliteTaskRepository};
    use crate::domain::models::TaskDraft;
    use chrono::Utc;

    type Service = DependencyService<SqliteDependencyRepository, SqliteTaskRepository, MokaCacheStore>;

    async fn setup_service(tasks: usize) -> Service {
        let pool = create_migrated_test_pool().await.unwrap();
        let task_repo = Arc::new(SqliteTaskRepository::new(pool.clone()));
        for i in 0..tasks {
            task_repo
                .insert(&TaskDraft::new(format!("task {i}"), "", Utc::now()))
                .await
                .unwrap();
        }

        let config = CacheConfig::default();
        let store = Arc::new(MokaCacheStore::from_config(&config));
        DependencyService::new(Arc::new(SqliteDependencyRepository::new(pool)), task_repo, store, &config)
    }

    #[tokio::test]
    async fn test_chain_rejects_closing_edge() {
        let service = setup_service(3).await;
        service.create_dependency(DependencyDraft::new(1, 2)).await.unwrap();
        service.create_dependency(DependencyDraft::new(2, 3)).await.unwrap();

        let err = service.create_dependency(DependencyDraft::new(3, 1)).await.unwrap_err();
        assert!(matches!(err, DomainError::DependencyCycle(_)));
        service.create_dependency(DependencyDraft::new(1, 3)).await.unwrap();

        assert_eq!(service.list_dependencies(None, None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_rejected_before_write() {
        let service = setup_service(2).await;
        service.create_dependency(DependencyDraft::new(1, 2)).await.unwrap();
        let err = service.create_dependency(DependencyDraft::new(1, 2)).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateDependency { .. }));
    }

    #[tokio::test]
    async fn test_unknown_task_is_validation_error() {
        let service = setup_service(1).await;
        let err = service.create_dependency(DependencyDraft::new(1, 7)).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
        assert!(service.dependencies_of(7).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_ignores_own_edge() {
        let service = setup_service(3).await;
        let edge = service.create_dependency(DependencyDraft::new(1, 2)).await.unwrap();
        service.create_dependency(DependencyDraft::new(2, 3)).await.unwrap();

        // Same endpoints is not a duplicate of itself.
        service.update_dependency(edge.id, DependencyDraft::new(1, 2)).await.unwrap();

        // 3 -> 2 would close 2 -> 3 -> 2.
        let err = service
            .update_dependency(edge.id, DependencyDraft::new(3, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DependencyCycle(_)));

        // Reversing edge 1 -> 2 is fine once the old direction is gone.
        let updated = service.update_dependency(edge.id, DependencyDraft::new(2, 1)).await.unwrap();
        assert_eq!(service.get_dependency(edge.id).await.unwrap(), updated);
        assert_eq!(service.dependencies_of(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_dependency() {
        let service = setup_service(2).await;
        let edge = service.create_dependency(DependencyDraft::new(1, 2)).await.unwrap();
        service.delete_dependency(edge.id).await.unwrap();

        assert!(service.get_dependency(edge.id).await.unwrap_err().is_not_found());
        assert!(matches!(
            service.delete_dependency(edge.id).await,
            Err(DomainError::DependencyNotFound(_))
        ));
        assert!(matches!(
            service.update_dependency(edge.id, DependencyDraft::new(1, 2)).await,
            Err(DomainError::DependencyNotFound(_))
        ));
    }
}
