//! DTOs for health check and re-probe endpoints.

use serde::Serialize;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Which storage backend is serving requests (`redis` or `memory`).
    pub backend: String,
    pub checks: HealthChecks,
}

/// Health status for each system component.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: CheckStatus,
}

/// Individual component health status.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for the operator-triggered storage re-probe.
#[derive(Debug, Serialize)]
pub struct ReprobeResponse {
    /// Selection after the re-probe (`primary` or `fallback`).
    pub backend: String,
    /// Whether re-probing is enabled in configuration.
    pub enabled: bool,
}
