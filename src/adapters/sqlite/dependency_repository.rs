//! SQLite implementation of the DependencyRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::task_repository::to_sql_int;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DependencyDraft, TaskDependency};
use crate::domain::ports::{DependencyRepository, RecordRepository};

#[derive(Clone)]
pub struct SqliteDependencyRepository {
    pool: SqlitePool,
}

impl SqliteDependencyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<TaskDependency> for SqliteDependencyRepository {
    async fn count(&self) -> DomainResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_dependencies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn list_page(&self, skip: u64, take: u64) -> DomainResult<Vec<TaskDependency>> {
        let rows: Vec<DependencyRow> = sqlx::query_as(
            "SELECT id, task_id, dependent_task_id FROM task_dependencies ORDER BY id DESC LIMIT ? OFFSET ?",
        )
        .bind(to_sql_int(take)?)
        .bind(to_sql_int(skip)?)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: i64) -> DomainResult<Option<TaskDependency>> {
        let row: Option<DependencyRow> =
            sqlx::query_as("SELECT id, task_id, dependent_task_id FROM task_dependencies WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl DependencyRepository for SqliteDependencyRepository {
    async fn insert(&self, draft: &DependencyDraft) -> DomainResult<TaskDependency> {
        let result = sqlx::query("INSERT INTO task_dependencies (task_id, dependent_task_id) VALUES (?, ?)")
            .bind(draft.task_id)
            .bind(draft.dependent_task_id)
            .execute(&self.pool)
            .await?;

        Ok(TaskDependency::new(
            result.last_insert_rowid(),
            draft.task_id,
            draft.dependent_task_id,
        ))
    }

    async fn update(&self, dependency: &TaskDependency) -> DomainResult<()> {
        let result = sqlx::query("UPDATE task_dependencies SET task_id = ?, dependent_task_id = ? WHERE id = ?")
            .bind(dependency.task_id)
            .bind(dependency.dependent_task_id)
            .bind(dependency.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::DependencyNotFound(dependency.id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM task_dependencies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::DependencyNotFound(id));
        }
        Ok(())
    }

    async fn list_edges(&self, source: Option<i64>) -> DomainResult<Vec<TaskDependency>> {
        let rows: Vec<DependencyRow> = match source {
            Some(task_id) => {
                sqlx::query_as(
                    "SELECT id, task_id, dependent_task_id FROM task_dependencies WHERE task_id = ? ORDER BY id",
                )
                .bind(task_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT id, task_id, dependent_task_id FROM task_dependencies ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(sqlx::FromRow)]
struct DependencyRow {
    id: i64,
    task_id: i64,
    dependent_task_id: i64,
}

impl From<DependencyRow> for TaskDependency {
    fn from(row: DependencyRow) -> Self {
        TaskDependency::new(row.id, row.task_id, row.dependent_task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{all_embedded_migrations, create_test_pool, Migrator, SqliteTaskRepository};
    use crate::domain::models::TaskDraft;
    use crate::domain::ports::TaskRepository;
    use chrono::Utc;

    async fn setup_test_repos(tasks: usize) -> (SqliteTaskRepository, SqliteDependencyRepository) {
        let pool = create_test_pool().await.unwrap();
        let migrator = Migrator::new(pool.clone());
        migrator.run_embedded_migrations(all_embedded_migrations()).await.unwrap();

        let task_repo = SqliteTaskRepository::new(pool.clone());
        for i in 0..tasks {
            task_repo
                .insert(&TaskDraft::new(format!("task {i}"), "", Utc::now()))
                .await
                .unwrap();
        }
        (task_repo, SqliteDependencyRepository::new(pool))
    }

    #[tokio::test]
    async fn test_insert_and_list_edges() {
        let (_tasks, repo) = setup_test_repos(3).await;
        let a = repo.insert(&DependencyDraft::new(1, 2)).await.unwrap();
        let b = repo.insert(&DependencyDraft::new(2, 3)).await.unwrap();
        repo.insert(&DependencyDraft::new(1, 3)).await.unwrap();

        assert_eq!(repo.get(a.id).await.unwrap(), Some(a));
        assert_eq!(repo.list_edges(None).await.unwrap().len(), 3);
        assert_eq!(repo.list_edges(Some(2)).await.unwrap(), vec![b]);

        let newest: Vec<i64> = repo.list_page(0, 2).await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(newest, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_duplicate_pair_is_constraint_violation() {
        let (_tasks, repo) = setup_test_repos(2).await;
        repo.insert(&DependencyDraft::new(1, 2)).await.unwrap();
        let err = repo.insert(&DependencyDraft::new(1, 2)).await.unwrap_err();
        assert!(matches!(err, DomainError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_constraint_violation() {
        let (_tasks, repo) = setup_test_repos(1).await;
        let err = repo.insert(&DependencyDraft::new(1, 42)).await.unwrap_err();
        assert!(matches!(err, DomainError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_task_with_edges_cannot_be_deleted() {
        let (tasks, repo) = setup_test_repos(2).await;
        let edge = repo.insert(&DependencyDraft::new(1, 2)).await.unwrap();

        let err = tasks.delete(2).await.unwrap_err();
        assert!(matches!(err, DomainError::ConstraintViolation(_)));

        repo.delete(edge.id).await.unwrap();
        tasks.delete(2).await.unwrap();
        assert!(matches!(repo.delete(edge.id).await, Err(DomainError::DependencyNotFound(_))));
    }
}
