//! Handler for unmatched routes.

use axum::http::Uri;
use serde_json::json;

use crate::error::AppError;

/// Returns a JSON 404 for any path no route matches (e.g. `/a/b`).
pub async fn fallback_handler(uri: Uri) -> AppError {
    AppError::not_found("Not found", json!({ "path": uri.path() }))
}
