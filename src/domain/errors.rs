//! Domain errors for the task tracker.

use thiserror::Error;

/// Format a cycle path as a human-readable string: `3 -> 1 -> 2 -> 3`.
fn format_cycle_path(path: &[i64]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Domain-level errors that can occur in the task tracker.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("Task dependency not found: {0}")]
    DependencyNotFound(i64),

    #[error("Dependency {task_id} -> {dependent_task_id} already exists")]
    DuplicateDependency { task_id: i64, dependent_task_id: i64 },

    #[error("Cannot create a circular dependency: {}", format_cycle_path(.0))]
    DependencyCycle(Vec<i64>),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Whether the error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_) | Self::DependencyNotFound(_))
    }

    /// Whether the error is a rejection detected before any write happened.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::DuplicateDependency { .. }
                | Self::DependencyCycle(_)
                | Self::ValidationFailed(_)
                | Self::ConstraintViolation(_)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() || db_err.is_unique_violation() {
                return DomainError::ConstraintViolation(db_err.message().to_string());
            }
        }
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
