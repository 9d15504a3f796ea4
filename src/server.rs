//! HTTP server initialization and runtime setup.
//!
//! Handles storage backend selection, state wiring, and Axum server
//! lifecycle.

use crate::application::services::LinkService;
use crate::config::Config;
use crate::infrastructure::storage::StorageSelector;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage selector (Redis if reachable, in-memory fallback otherwise)
/// - Link service
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if the listen address is invalid, the bind fails, or a
/// server runtime error occurs. An unreachable Redis is *not* an error: the
/// selector degrades to the in-memory store and the service stays up.
pub async fn run(config: Config) -> Result<()> {
    let storage = Arc::new(StorageSelector::new(config.storage_settings()));

    // Probe at startup rather than on the first request, so the retry delay
    // is paid before the listener opens and the decision is already logged.
    let backend = storage.store().await;
    tracing::info!("Storage ready ({})", backend.name());

    let links = Arc::new(LinkService::new(
        storage.clone(),
        config.base_url.clone(),
        config.link_ttl(),
    ));

    let state = AppState::new(links, storage);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
