#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::routing::{get, post};
use axum_test::TestServer;
use snaplink::api::handlers::{health_handler, redirect_handler, reprobe_handler};
use snaplink::api::routes::api_routes;
use snaplink::application::services::LinkService;
use snaplink::infrastructure::storage::{
    BackendKind, KeyValueStore, MemoryStore, StorageSelector, StoreError, StoreResult,
};
use snaplink::state::AppState;

pub const BASE_URL: &str = "https://s.test.com";
pub const LINK_TTL: Duration = Duration::from_secs(60);

/// State pinned to a fresh in-memory store; the store handle is returned so
/// tests can seed or inspect entries directly.
pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let selector = Arc::new(StorageSelector::with_store(
        store.clone() as Arc<dyn KeyValueStore>,
        BackendKind::Fallback,
    ));
    (state_with(selector), store)
}

pub fn state_with(selector: Arc<StorageSelector>) -> AppState {
    let links = Arc::new(LinkService::new(selector.clone(), BASE_URL, LINK_TTL));
    AppState::new(links, selector)
}

pub fn test_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .route("/health/reprobe", post(reprobe_handler))
        .nest("/api", api_routes())
        .with_state(state);

    TestServer::new(app).unwrap()
}

/// Store double whose every operation fails with a connection error, for
/// asserting that outages surface as 503 rather than 404.
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> StoreResult<()> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> StoreResult<bool> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

pub fn failing_state() -> AppState {
    let selector = Arc::new(StorageSelector::with_store(
        Arc::new(FailingStore),
        BackendKind::Primary,
    ));
    state_with(selector)
}
