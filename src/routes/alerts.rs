//! Project alert routes.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::extract::{AppJson, AppQuery};
use crate::errors::{ApiResponse, AppError};
use crate::models::alert::{Alert, CreateAlert};
use crate::services::alert::{self as alert_service, AlertFilters};
use crate::AppState;

/// GET /api/alerts
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filters): AppQuery<AlertFilters>,
) -> Result<Json<ApiResponse<Vec<Alert>>>, AppError> {
    let alerts = alert_service::list(&state.db, &filters)
        .await
        .map_err(|e| e.context("Failed to fetch alerts"))?;
    Ok(ApiResponse::list(alerts))
}

/// POST /api/alerts
pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateAlert>,
) -> Result<(StatusCode, Json<ApiResponse<Alert>>), AppError> {
    let alert = alert_service::create(&state.db, &body)
        .await
        .map_err(|e| e.context("Failed to create alert"))?;
    Ok((StatusCode::CREATED, ApiResponse::success(alert)))
}
