use std::sync::Arc;

use crate::application::services::LinkService;
use crate::infrastructure::storage::StorageSelector;

/// Shared application state injected into all handlers.
///
/// The storage selector is owned here and passed around explicitly; there is
/// no global client or pool state anywhere in the crate.
#[derive(Clone)]
pub struct AppState {
    pub links: Arc<LinkService>,
    pub storage: Arc<StorageSelector>,
}

impl AppState {
    pub fn new(links: Arc<LinkService>, storage: Arc<StorageSelector>) -> Self {
        Self { links, storage }
    }
}
