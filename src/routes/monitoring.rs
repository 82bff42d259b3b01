//! Monitoring record routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::extract::{AppJson, AppQuery};
use crate::errors::{ApiResponse, AppError};
use crate::models::monitoring::{CreateMonitoringRecord, MonitoringRecord};
use crate::services::monitoring::{self as monitoring_service, MonitoringFilters};
use crate::AppState;

/// POST /api/monitoring — record a field measurement.
pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateMonitoringRecord>,
) -> Result<(StatusCode, Json<ApiResponse<MonitoringRecord>>), AppError> {
    let record = monitoring_service::create(&state.db, &body)
        .await
        .map_err(|e| e.context("Failed to create monitoring record"))?;
    Ok((StatusCode::CREATED, ApiResponse::success(record)))
}

/// GET /api/monitoring/{projectId} — history for one project, newest first.
pub async fn list_for_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    AppQuery(filters): AppQuery<MonitoringFilters>,
) -> Result<Json<ApiResponse<Vec<MonitoringRecord>>>, AppError> {
    let records = monitoring_service::list_for_project(&state.db, &project_id, &filters)
        .await
        .map_err(|e| e.context("Failed to fetch monitoring data"))?;
    Ok(ApiResponse::list(records))
}
