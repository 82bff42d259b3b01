//! Multipart file upload route.

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;

use crate::errors::{ApiResponse, AppError};
use crate::services::upload::{self, StoredUpload, UploadRequest, UploadSettings, UploadedFile};
use crate::AppState;

/// POST /api/upload — multipart fields `file`, `projectId`, optional `type`.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<StoredUpload>>, AppError> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                request.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "projectId" | "type" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                if name == "projectId" {
                    request.project_id = Some(value);
                } else {
                    request.kind = Some(value);
                }
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown upload field");
            }
        }
    }

    let settings = UploadSettings {
        root: state.config.upload_dir.clone(),
        public_base_url: state.config.upload_public_base_url.clone(),
        max_bytes: state.config.max_upload_bytes,
    };
    let stored = upload::store(&settings, request, Utc::now())
        .await
        .map_err(|e| e.context("Failed to upload file"))?;
    Ok(ApiResponse::success(stored))
}
