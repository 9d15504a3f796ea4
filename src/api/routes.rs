//! API route configuration.

use crate::api::handlers::{delete_link_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, post},
};

/// REST API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /shorten`       - Create a shortened URL
/// - `DELETE /links/{code}`  - Delete a link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/links/{code}", delete(delete_link_handler))
}
