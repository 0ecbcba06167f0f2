use async_trait::async_trait;

use super::record_repository::RecordRepository;
use crate::domain::errors::DomainResult;
use crate::domain::models::{TaskDraft, TaskItem};

/// Repository port for task persistence operations
#[async_trait]
pub trait TaskRepository: RecordRepository<TaskItem> {
    /// Insert a new task; the repository assigns its identifier.
    async fn insert(&self, draft: &TaskDraft) -> DomainResult<TaskItem>;

    /// Update an existing task
    async fn update(&self, task: &TaskItem) -> DomainResult<()>;

    /// Delete a task by ID
    async fn delete(&self, id: i64) -> DomainResult<()>;
}
