//! Dashboard analytics route.

use axum::{
    extract::State,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use super::extract::AppQuery;
use crate::errors::{ApiResponse, AppError};
use crate::services::analytics::{self, DashboardSummary};
use crate::AppState;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardParams {
    pub organization_id: Option<String>,
}

/// GET /api/analytics/dashboard — totals, distributions, carbon trend and recent activity.
pub async fn dashboard(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<DashboardParams>,
) -> Result<Json<ApiResponse<DashboardSummary>>, AppError> {
    let organization_id = params
        .organization_id
        .as_deref()
        .filter(|id| !id.trim().is_empty());
    let summary = analytics::dashboard_summary(&state.db, organization_id, Utc::now())
        .await
        .map_err(|e| e.context("Failed to fetch dashboard data"))?;
    Ok(ApiResponse::success(summary))
}
