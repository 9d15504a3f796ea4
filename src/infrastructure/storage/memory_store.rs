//! In-process fallback store implementation.

use super::store::{KeyValueStore, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Stored value with its optional absolute expiry.
#[derive(Debug, Clone)]
struct StorageEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl StorageEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() > at)
    }
}

/// In-memory store used when Redis cannot be reached, and for local
/// development.
///
/// One coarse mutex guards the whole mapping; expected load on the fallback
/// path is trivial, so there is no sharding. The lock is only held for map
/// mutation, never across I/O or an await point. Expiry is evaluated lazily:
/// a read of an expired entry removes it and reports absence.
///
/// Contents do not survive a process restart; that is an accepted limitation
/// of the fallback, not a defect.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StorageEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        debug!("Using in-memory store");
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StorageEntry>> {
        // A poisoned lock only means a panic mid-mutation; the map itself
        // stays structurally sound.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()> {
        let entry = StorageEntry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };

        self.lock().insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut entries = self.lock();

        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        Ok(self.lock().remove(key).is_some())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
