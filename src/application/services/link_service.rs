//! Short link creation, resolution, and deletion.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::domain::entities::ShortLink;
use crate::error::AppError;
use crate::infrastructure::storage::StorageSelector;
use crate::utils::code_generator::generate_code;

/// Service for creating and resolving shortened links.
///
/// Composes the deterministic code generator with whichever storage backend
/// the [`StorageSelector`] settled on. The selector is injected, so tests can
/// pin it to an in-memory or mock store.
pub struct LinkService {
    storage: Arc<StorageSelector>,
    base_url: String,
    link_ttl: Duration,
}

impl LinkService {
    pub fn new(storage: Arc<StorageSelector>, base_url: impl Into<String>, link_ttl: Duration) -> Self {
        Self {
            storage,
            base_url: base_url.into(),
            link_ttl,
        }
    }

    /// Creates a short link for `long_url`.
    ///
    /// The input is trimmed; an empty URL is rejected before anything is
    /// written. The code is derived deterministically, so repeating the call
    /// with the same URL yields the same code, and a colliding URL simply
    /// overwrites the previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for empty input and
    /// [`AppError::Storage`] when the write did not reach the selected
    /// backend — never a partial success.
    pub async fn create_short_link(&self, long_url: &str) -> Result<ShortLink, AppError> {
        let long_url = long_url.trim();
        if long_url.is_empty() {
            return Err(AppError::bad_request("URL must not be empty", json!({})));
        }

        let code = generate_code(long_url);
        let store = self.storage.store().await;

        store.set(&code, long_url, Some(self.link_ttl)).await?;
        debug!("Created short link {} -> {}", code, long_url);

        let created_at = Utc::now();
        Ok(ShortLink {
            code,
            long_url: long_url.to_string(),
            created_at,
            expires_at: chrono::Duration::from_std(self.link_ttl)
                .ok()
                .map(|ttl| created_at + ttl),
        })
    }

    /// Resolves a short code back to its original URL.
    ///
    /// # Errors
    ///
    /// An absent (or expired) code is [`AppError::NotFound`] — a normal
    /// business outcome. A backend communication failure is
    /// [`AppError::Storage`], kept distinct so callers never turn an outage
    /// into a 404.
    pub async fn resolve_short_link(&self, code: &str) -> Result<String, AppError> {
        let store = self.storage.store().await;

        match store.get(code).await? {
            Some(url) => Ok(url),
            None => {
                debug!("Short link {} not found", code);
                Err(AppError::not_found(
                    "Short link not found",
                    json!({ "code": code }),
                ))
            }
        }
    }

    /// Deletes a short link.
    ///
    /// Returns `Ok(true)` when an entry was removed, `Ok(false)` when there
    /// was nothing to remove.
    pub async fn delete_short_link(&self, code: &str) -> Result<bool, AppError> {
        let store = self.storage.store().await;
        Ok(store.delete(code).await?)
    }

    /// Composes the fully-qualified short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }
}
