//! Project routes: list, create, read, partial update, delete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::extract::{AppJson, AppQuery};
use crate::errors::{ApiResponse, AppError};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::services::project::{self as project_service, ProjectFilters};
use crate::AppState;

/// GET /api/projects — list projects with optional filters.
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filters): AppQuery<ProjectFilters>,
) -> Result<Json<ApiResponse<Vec<Project>>>, AppError> {
    let projects = project_service::list(&state.db, &filters)
        .await
        .map_err(|e| e.context("Failed to fetch projects"))?;
    Ok(ApiResponse::list(projects))
}

/// POST /api/projects — create a project.
pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateProject>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), AppError> {
    let project = project_service::create(&state.db, &body)
        .await
        .map_err(|e| e.context("Failed to create project"))?;
    Ok((StatusCode::CREATED, ApiResponse::success(project)))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Project>>, AppError> {
    let project = project_service::find_by_id(&state.db, &id)
        .await
        .map_err(|e| e.context("Failed to fetch project"))?;
    Ok(ApiResponse::success(project))
}

/// PUT /api/projects/{id} — partial update; echoes the applied fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateProject>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let applied = project_service::update(&state.db, &id, &body)
        .await
        .map_err(|e| e.context("Failed to update project"))?;
    Ok(ApiResponse::success(applied))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    project_service::delete(&state.db, &id)
        .await
        .map_err(|e| e.context("Failed to delete project"))?;
    Ok(ApiResponse::message("Project deleted successfully"))
}
