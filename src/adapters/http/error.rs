//! Mapping of domain errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Rejection returned by every handler.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub type ApiResult<T> = Result<T, ApiError>;

/// Not-found is 404, anything rejected before a write is 400, the rest 500.
pub fn api_error(err: DomainError) -> ApiError {
    let (status, code) = match &err {
        DomainError::TaskNotFound(_) => (StatusCode::NOT_FOUND, "TASK_NOT_FOUND"),
        DomainError::DependencyNotFound(_) => (StatusCode::NOT_FOUND, "DEPENDENCY_NOT_FOUND"),
        DomainError::DuplicateDependency { .. } => (StatusCode::BAD_REQUEST, "DUPLICATE_DEPENDENCY"),
        DomainError::DependencyCycle(_) => (StatusCode::BAD_REQUEST, "CIRCULAR_DEPENDENCY"),
        DomainError::ValidationFailed(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        DomainError::ConstraintViolation(_) => (StatusCode::BAD_REQUEST, "CONSTRAINT_VIOLATION"),
        DomainError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        DomainError::SerializationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR"),
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else if err.is_rejection() {
        tracing::debug!(error = %err, code, "request rejected");
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(api_error(DomainError::TaskNotFound(1)).0, StatusCode::NOT_FOUND);
        assert_eq!(api_error(DomainError::DependencyCycle(vec![1, 2, 1])).0, StatusCode::BAD_REQUEST);
        assert_eq!(
            api_error(DomainError::ConstraintViolation("FOREIGN KEY".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            api_error(DomainError::DatabaseError("locked".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_body_carries_code() {
        let (_, Json(body)) = api_error(DomainError::DuplicateDependency {
            task_id: 1,
            dependent_task_id: 2,
        });
        assert_eq!(body.code, "DUPLICATE_DEPENDENCY");
        assert!(body.error.contains("1 -> 2"));
    }
}
