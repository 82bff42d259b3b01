//! Liveness and readiness checks.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::db;
use crate::errors::ApiResponse;
use crate::AppState;

/// Readiness detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: String,
}

/// Always OK while the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Ready only when the database answers; otherwise 503 with `success: false`.
pub async fn ready(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthStatus>>) {
    match db::ping(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            ApiResponse::success(HealthStatus {
                status: "ok",
                database: "connected".to_string(),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiResponse::failure(
                    HealthStatus {
                        status: "degraded",
                        database: "unreachable".to_string(),
                    },
                    "Database unavailable",
                ),
            )
        }
    }
}
