//! SQLite implementation of the TaskRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::parse_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{PriorityLevel, TaskDraft, TaskItem, TaskStatus};
use crate::domain::ports::{RecordRepository, TaskRepository};

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository<TaskItem> for SqliteTaskRepository {
    async fn count(&self) -> DomainResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn list_page(&self, skip: u64, take: u64) -> DomainResult<Vec<TaskItem>> {
        let rows: Vec<TaskItemRow> =
            sqlx::query_as("SELECT * FROM task_items ORDER BY id DESC LIMIT ? OFFSET ?")
                .bind(to_sql_int(take)?)
                .bind(to_sql_int(skip)?)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get(&self, id: i64) -> DomainResult<Option<TaskItem>> {
        let row: Option<TaskItemRow> = sqlx::query_as("SELECT * FROM task_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn insert(&self, draft: &TaskDraft) -> DomainResult<TaskItem> {
        let result = sqlx::query(
            "INSERT INTO task_items (title, description, due_date, priority, status) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.due_date.to_rfc3339())
        .bind(draft.priority.as_str())
        .bind(draft.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(TaskItem::from_draft(result.last_insert_rowid(), draft.clone()))
    }

    async fn update(&self, task: &TaskItem) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE task_items SET title = ?, description = ?, due_date = ?, priority = ?, status = ? WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date.to_rfc3339())
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .bind(task.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TaskNotFound(task.id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM task_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TaskNotFound(id));
        }
        Ok(())
    }
}

/// Bind a page bound as an SQLite integer.
pub(super) fn to_sql_int(value: u64) -> DomainResult<i64> {
    i64::try_from(value).map_err(|_| DomainError::ValidationFailed(format!("{value} is out of range")))
}

#[derive(sqlx::FromRow)]
struct TaskItemRow {
    id: i64,
    title: String,
    description: String,
    due_date: String,
    priority: String,
    status: String,
}

impl TryFrom<TaskItemRow> for TaskItem {
    type Error = DomainError;

    fn try_from(row: TaskItemRow) -> Result<Self, Self::Error> {
        let priority = PriorityLevel::from_str(&row.priority)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid priority: {}", row.priority)))?;
        let status = TaskStatus::from_str(&row.status)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid status: {}", row.status)))?;

        Ok(TaskItem {
            id: row.id,
            title: row.title,
            description: row.description,
            due_date: parse_datetime(&row.due_date)?,
            priority,
            status,
        })
    }
}
