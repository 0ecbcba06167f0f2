//! Task service: CRUD over tasks with the paged read cache in front.

use std::sync::Arc;

use tracing::{debug, info};

use super::paged_cache::PagedCache;
use super::pagination::PagePolicy;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CacheConfig, TaskDraft, TaskItem};
use crate::domain::ports::{CacheStore, TaskRepository};

/// Tasks stored in `T` with pages cached in `C`.
pub struct TaskService<T, C> {
    repo: Arc<T>,
    cache: PagedCache<TaskItem, T, C>,
    paging: PagePolicy,
}

impl<T, C> TaskService<T, C>
where
    T: TaskRepository + 'static,
    C: CacheStore + 'static,
{
    /// Service whose page cache follows `config`.
    pub fn new(repo: Arc<T>, store: Arc<C>, config: &CacheConfig) -> Self {
        let cache = PagedCache::new(repo.clone(), store)
            .with_ttl(config.ttl())
            .with_chain_lock(config.serialize_page_writes);
        Self {
            repo,
            cache,
            paging: PagePolicy::from(config),
        }
    }

    /// Page defaults and bounds applied to list calls.
    pub fn page_policy(&self) -> PagePolicy {
        self.paging
    }

    /// One page of tasks, newest first.
    pub async fn list_tasks(&self, page_index: Option<usize>, page_size: Option<usize>) -> DomainResult<Vec<TaskItem>> {
        let (index, size) = self.paging.resolve(page_index, page_size)?;
        if self.paging.is_cached(size) {
            return self.cache.get_page(index, size).await;
        }

        debug!(page = index, page_size = size, "uncached page size, reading tasks from database");
        self.repo.list_page(PagePolicy::offset(index, size)?, size as u64).await
    }

    /// One task, read through the item cache.
    pub async fn get_task(&self, id: i64) -> DomainResult<TaskItem> {
        self.cache.get_one(id).await
    }

    /// Insert a task and put it at the head of page 1.
    pub async fn create_task(&self, draft: TaskDraft) -> DomainResult<TaskItem> {
        draft.validate()?;
        let task = self.repo.insert(&draft).await?;
        self.cache.insert_front(task.clone(), self.paging.default_size).await;

        info!(task_id = task.id, title = %task.title, "task created");
        Ok(task)
    }

    /// Replace every field of task `id` with the draft.
    pub async fn update_task(&self, id: i64, draft: TaskDraft) -> DomainResult<TaskItem> {
        draft.validate()?;
        let mut task = self.repo.get(id).await?.ok_or(DomainError::TaskNotFound(id))?;
        task.apply(draft);

        self.repo.update(&task).await?;
        self.cache.update_one(task.clone(), self.paging.default_size).await;

        info!(task_id = id, status = %task.status, "task updated");
        Ok(task)
    }

    /// Delete task `id`. Fails while any dependency still references it.
    pub async fn delete_task(&self, id: i64) -> DomainResult<()> {
        self.repo.delete(id).await.map_err(|e| match e {
            DomainError::ConstraintViolation(_) => {
                DomainError::ConstraintViolation(format!("task {id} is still referenced by a dependency"))
            }
            other => other,
        })?;
        self.cache.delete_one(id, self.paging.default_size).await;

        info!(task_id = id, "task deleted");
        Ok(())
    }

    /// Backfill every uncached page of the default size.
    pub async fn warm_cache(&self) -> DomainResult<usize> {
        self.cache.warm(self.paging.default_size).await
    }

    /// Number of tasks in the database.
    pub async fn count(&self) -> DomainResult<u64> {
        self.repo.count().await
    }
}
