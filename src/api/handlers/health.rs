//! Handlers for health check and storage re-probe endpoints.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse, ReprobeResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: all components healthy
/// - **503 Service Unavailable**: one or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "backend": "redis",
///   "checks": {
///     "storage": { "status": "ok", "message": "redis backend responding" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store = state.storage.store().await;

    let storage_check = if store.health_check().await {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("{} backend responding", store.name())),
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some(format!("{} backend not responding", store.name())),
        }
    };

    let all_healthy = storage_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: store.name().to_string(),
        checks: HealthChecks {
            storage: storage_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Re-attempts primary storage construction on operator demand.
///
/// # Endpoint
///
/// `POST /health/reprobe`
///
/// The backend decision is sticky by default; this is the explicit
/// operational signal for promoting back to the primary after an outage.
/// When re-probing is disabled in configuration the call reports the
/// current selection without probing.
pub async fn reprobe_handler(State(state): State<AppState>) -> Json<ReprobeResponse> {
    let kind = state.storage.reprobe().await;

    Json(ReprobeResponse {
        backend: kind.as_str().to_string(),
        enabled: state.storage.reprobe_enabled(),
    })
}
