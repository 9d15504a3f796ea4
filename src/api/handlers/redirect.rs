//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist or has expired —
/// a normal outcome, not a server failure. Storage outages surface as
/// 503 Service Unavailable instead, so an unreachable backend is never
/// reported as a missing link.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let long_url = state.links.resolve_short_link(&code).await?;

    Ok(Redirect::temporary(&long_url))
}
