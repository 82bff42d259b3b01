//! Request extractors whose rejections use the API error envelope.
//!
//! axum's own `Json` and `Query` reject with a plain-text body; these
//! wrappers route the rejection through [`AppError`] instead, so a malformed
//! body or query string still answers `{"success": false, "error": ...}`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Deserialized query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
