//! Unified error handling with the `{success, data, error}` response envelope.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            count: None,
            message: None,
            error: None,
        })
    }

    /// A failed outcome that still carries detail for the caller.
    pub fn failure(data: T, message: &str) -> Json<Self> {
        Json(Self {
            success: false,
            data: Some(data),
            count: None,
            message: None,
            error: Some(message.to_string()),
        })
    }

    /// Wrap an error in the envelope.
    pub fn error(message: &str) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            count: None,
            message: None,
            error: Some(message.to_string()),
        })
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Wrap a list result, reporting its length alongside.
    pub fn list(items: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            count: Some(items.len()),
            data: Some(items),
            message: None,
            error: None,
        })
    }
}

impl ApiResponse<()> {
    /// Success with a human-readable message and no payload.
    pub fn message(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            count: None,
            message: Some(message.to_string()),
            error: None,
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document {collection}/{id} failed to decode: {source}")]
    Decode {
        collection: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("{message}")]
    Operation {
        message: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this error is the caller's fault (maps to a 4xx status).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Validation(_))
    }

    /// Replace a server-side failure with a public, endpoint-specific message.
    ///
    /// Client errors pass through so their message still reaches the caller.
    pub fn context(self, message: &str) -> Self {
        if self.is_client_error() || matches!(self, Self::Operation { .. }) {
            return self;
        }
        Self::Operation {
            message: message.to_string(),
            source: Box::new(self),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Operation { message, source } => {
                tracing::error!(error = %source, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Decode { .. } | AppError::Storage(_) | AppError::Generation(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, ApiResponse::<()>::error(&message)).into_response()
    }
}
