//! Prompt flow routes.

use axum::{extract::State, Json};

use super::extract::AppJson;
use crate::errors::{ApiResponse, AppError};
use crate::services::flows::{self, QueryInput, SearchOutput, SuggestOutput, VisualizeInput, VisualizeOutput};
use crate::AppState;

/// POST /api/flows/visualize
pub async fn visualize(
    State(state): State<AppState>,
    AppJson(body): AppJson<VisualizeInput>,
) -> Result<Json<ApiResponse<VisualizeOutput>>, AppError> {
    let output = flows::visualize(&state.generator, &body)
        .await
        .map_err(|e| e.context("AI failed to generate a visualization. Please try again."))?;
    Ok(ApiResponse::success(output))
}

/// POST /api/flows/search
pub async fn search(
    State(state): State<AppState>,
    AppJson(body): AppJson<QueryInput>,
) -> Result<Json<ApiResponse<SearchOutput>>, AppError> {
    let output = flows::search(&state.generator, &body.query)
        .await
        .map_err(|e| e.context("Search failed. Please try again."))?;
    Ok(ApiResponse::success(output))
}

/// POST /api/flows/suggest
pub async fn suggest(
    State(state): State<AppState>,
    AppJson(body): AppJson<QueryInput>,
) -> Json<ApiResponse<SuggestOutput>> {
    ApiResponse::success(flows::suggest(&state.cities, &body.query))
}
