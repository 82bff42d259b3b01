//! Dashboard feed routes: threat alerts and the report catalogue.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::models::dashboard::{DashboardAlert, DashboardReport};
use crate::services::dashboard as dashboard_service;
use crate::AppState;

/// GET /api/dashboard/alerts
pub async fn alerts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DashboardAlert>>>, AppError> {
    let alerts = dashboard_service::list_alerts(&state.db)
        .await
        .map_err(|e| e.context("Failed to fetch alerts"))?;
    Ok(ApiResponse::list(alerts))
}

/// GET /api/dashboard/reports
pub async fn reports(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DashboardReport>>>, AppError> {
    let reports = dashboard_service::list_reports(&state.db)
        .await
        .map_err(|e| e.context("Failed to fetch reports"))?;
    Ok(ApiResponse::list(reports))
}
