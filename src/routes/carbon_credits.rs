//! Carbon credit routes.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::extract::{AppJson, AppQuery};
use crate::errors::{ApiResponse, AppError};
use crate::models::carbon_credit::{CarbonCredit, CreateCarbonCredit};
use crate::services::carbon_credit::{self as credit_service, CreditFilters};
use crate::AppState;

/// GET /api/carbon-credits
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filters): AppQuery<CreditFilters>,
) -> Result<Json<ApiResponse<Vec<CarbonCredit>>>, AppError> {
    let credits = credit_service::list(&state.db, &filters)
        .await
        .map_err(|e| e.context("Failed to fetch carbon credits"))?;
    Ok(ApiResponse::list(credits))
}

/// POST /api/carbon-credits — issue a credit with a fresh serial number.
pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateCarbonCredit>,
) -> Result<(StatusCode, Json<ApiResponse<CarbonCredit>>), AppError> {
    let credit = credit_service::create(&state.db, &body)
        .await
        .map_err(|e| e.context("Failed to create carbon credit"))?;
    Ok((StatusCode::CREATED, ApiResponse::success(credit)))
}
