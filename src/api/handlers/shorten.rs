//! Handler for the link shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a shortened URL for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/very/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "code": "abc123",
///   "short_url": "https://s.example.com/abc123",
///   "expires_at": "2026-09-06T12:00:00Z"
/// }
/// ```
///
/// Shortening is deterministic: repeating the call with the same URL returns
/// the same code.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails and 503 Service Unavailable
/// if the write did not reach the storage backend.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let link = state.links.create_short_link(&payload.url).await?;
    let short_url = state.links.short_url(&link.code);

    Ok(Json(ShortenResponse {
        code: link.code,
        short_url,
        expires_at: link.expires_at,
    }))
}
