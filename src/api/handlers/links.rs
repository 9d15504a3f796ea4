//! Handlers for link management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Deletes a short link.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Response Codes
///
/// - **204 No Content**: the link existed and was removed
/// - **404 Not Found**: nothing stored under the code
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    if state.links.delete_short_link(&code).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(
            "Short link not found",
            json!({ "code": code }),
        ))
    }
}
