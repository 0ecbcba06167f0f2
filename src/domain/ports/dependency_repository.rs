use async_trait::async_trait;

use super::record_repository::RecordRepository;
use crate::domain::errors::DomainResult;
use crate::domain::models::{DependencyDraft, TaskDependency};

/// Repository port for dependency edges
#[async_trait]
pub trait DependencyRepository: RecordRepository<TaskDependency> {
    /// Insert a new edge; the repository assigns its identifier.
    async fn insert(&self, draft: &DependencyDraft) -> DomainResult<TaskDependency>;

    /// Replace the endpoints of an existing edge
    async fn update(&self, dependency: &TaskDependency) -> DomainResult<()>;

    /// Delete an edge by ID
    async fn delete(&self, id: i64) -> DomainResult<()>;

    /// All edges, or only those leaving `source` when given.
    async fn list_edges(&self, source: Option<i64>) -> DomainResult<Vec<TaskDependency>>;
}
