//! Request handlers for tasks and dependencies.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{api_error, ApiResult};
use crate::adapters::sqlite::verify_connection;
use crate::domain::models::{DependencyDraft, TaskDependency, TaskDraft, TaskItem};
use crate::domain::ports::CacheStore;
use crate::infrastructure::AppContext;

/// Query parameters for paged listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page_index: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub cache: String,
    pub database: String,
}

type AppState = State<Arc<AppContext>>;

pub async fn health_check(State(ctx): AppState) -> Json<HealthResponse> {
    let database = match verify_connection(&ctx.pool).await {
        Ok(_) => "ok",
        Err(_) => "unavailable",
    };
    let cache = match ctx.cache.health_check().await {
        Ok(true) => ctx.cache.provider_name().to_string(),
        _ => format!("{} (unhealthy)", ctx.cache.provider_name()),
    };

    Json(HealthResponse {
        status: "OK".to_string(),
        cache,
        database: database.to_string(),
    })
}

// Tasks

pub async fn list_tasks(State(ctx): AppState, Query(page): Query<PageQuery>) -> ApiResult<Json<Vec<TaskItem>>> {
    ctx.tasks
        .list_tasks(page.page_index, page.page_size)
        .await
        .map(Json)
        .map_err(api_error)
}

pub async fn get_task(State(ctx): AppState, Path(id): Path<i64>) -> ApiResult<Json<TaskItem>> {
    ctx.tasks.get_task(id).await.map(Json).map_err(api_error)
}

pub async fn task_dependencies(State(ctx): AppState, Path(id): Path<i64>) -> ApiResult<Json<Vec<TaskDependency>>> {
    ctx.dependencies
        .dependencies_of(id)
        .await
        .map(Json)
        .map_err(api_error)
}

pub async fn create_task(
    State(ctx): AppState,
    Json(draft): Json<TaskDraft>,
) -> ApiResult<(StatusCode, Json<TaskItem>)> {
    let task = ctx.tasks.create_task(draft).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(ctx): AppState,
    Path(id): Path<i64>,
    Json(draft): Json<TaskDraft>,
) -> ApiResult<StatusCode> {
    ctx.tasks.update_task(id, draft).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_task(State(ctx): AppState, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    ctx.tasks.delete_task(id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// Dependencies

pub async fn list_dependencies(
    State(ctx): AppState,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<TaskDependency>>> {
    ctx.dependencies
        .list_dependencies(page.page_index, page.page_size)
        .await
        .map(Json)
        .map_err(api_error)
}

pub async fn get_dependency(State(ctx): AppState, Path(id): Path<i64>) -> ApiResult<Json<TaskDependency>> {
    ctx.dependencies.get_dependency(id).await.map(Json).map_err(api_error)
}

pub async fn create_dependency(
    State(ctx): AppState,
    Json(draft): Json<DependencyDraft>,
) -> ApiResult<(StatusCode, Json<TaskDependency>)> {
    let dependency = ctx.dependencies.create_dependency(draft).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(dependency)))
}

pub async fn update_dependency(
    State(ctx): AppState,
    Path(id): Path<i64>,
    Json(draft): Json<DependencyDraft>,
) -> ApiResult<StatusCode> {
    ctx.dependencies
        .update_dependency(id, draft)
        .await
        .map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_dependency(State(ctx): AppState, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    ctx.dependencies.delete_dependency(id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
