//! Backend selection: Redis when reachable, in-memory otherwise.

use super::memory_store::MemoryStore;
use super::redis_store::RedisStore;
use super::store::{KeyValueStore, StorageSettings};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Which backend the selector settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The networked Redis store.
    Primary,
    /// The in-process store.
    Fallback,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Clone)]
struct Selection {
    kind: BackendKind,
    store: Arc<dyn KeyValueStore>,
}

/// Decides, once per process, which store serves requests.
///
/// The first caller to need a store triggers a probe: construct
/// [`RedisStore`] and, if that fails for any reason, fall back to
/// [`MemoryStore`]. The decision is cached and reused for the rest of the
/// process lifetime. Concurrent first access performs exactly one probe;
/// losers of the race wait on the probe lock and observe the winner's
/// result, never partial state.
///
/// Recovery back to the primary is deliberately not automatic. An operator
/// can trigger [`StorageSelector::reprobe`] (surfaced on the health
/// endpoint), which only acts when `reprobe_enabled` is set.
///
/// One selector instance is owned by the application state and passed
/// explicitly to whoever needs storage; there is no global client.
pub struct StorageSelector {
    settings: StorageSettings,
    selection: RwLock<Option<Selection>>,
    probe_lock: Mutex<()>,
    probe_attempts: AtomicU32,
}

impl StorageSelector {
    pub fn new(settings: StorageSettings) -> Self {
        Self {
            settings,
            selection: RwLock::new(None),
            probe_lock: Mutex::new(()),
            probe_attempts: AtomicU32::new(0),
        }
    }

    /// Pins the selection to a caller-provided store.
    ///
    /// No probe ever runs; used to inject test doubles and embedded setups.
    pub fn with_store(store: Arc<dyn KeyValueStore>, kind: BackendKind) -> Self {
        Self {
            settings: StorageSettings::default(),
            selection: RwLock::new(Some(Selection { kind, store })),
            probe_lock: Mutex::new(()),
            probe_attempts: AtomicU32::new(0),
        }
    }

    /// Returns the selected store, probing on first use.
    pub async fn store(&self) -> Arc<dyn KeyValueStore> {
        if let Some(selection) = self.selection.read().await.as_ref() {
            return selection.store.clone();
        }
        self.select().await.store
    }

    /// Returns the selected backend kind, probing on first use.
    pub async fn backend_kind(&self) -> BackendKind {
        if let Some(selection) = self.selection.read().await.as_ref() {
            return selection.kind;
        }
        self.select().await.kind
    }

    /// Re-attempts primary construction on an operator signal.
    ///
    /// Without `reprobe_enabled` this only reports the current selection.
    /// With it, a successful probe promotes back to the primary; a failed
    /// one keeps whatever is currently selected.
    pub async fn reprobe(&self) -> BackendKind {
        if !self.settings.reprobe_enabled {
            return self.backend_kind().await;
        }

        let _guard = self.probe_lock.lock().await;

        let current = self.selection.read().await.clone();
        if let Some(selection) = &current
            && selection.kind == BackendKind::Primary
        {
            return BackendKind::Primary;
        }

        let probed = self.probe().await;
        if probed.kind == BackendKind::Primary || current.is_none() {
            let kind = probed.kind;
            *self.selection.write().await = Some(probed);
            kind
        } else {
            BackendKind::Fallback
        }
    }

    /// Number of primary construction attempts made so far.
    pub fn probe_attempts(&self) -> u32 {
        self.probe_attempts.load(Ordering::Relaxed)
    }

    /// Whether the operator re-probe is allowed to act.
    pub fn reprobe_enabled(&self) -> bool {
        self.settings.reprobe_enabled
    }

    async fn select(&self) -> Selection {
        let _guard = self.probe_lock.lock().await;

        // A racing caller may have finished the probe while we waited.
        if let Some(selection) = self.selection.read().await.as_ref() {
            return selection.clone();
        }

        let selection = self.probe().await;
        *self.selection.write().await = Some(selection.clone());
        selection
    }

    async fn probe(&self) -> Selection {
        self.probe_attempts.fetch_add(1, Ordering::Relaxed);

        match RedisStore::connect(&self.settings).await {
            Ok(store) => {
                info!("Storage backend selected: redis");
                Selection {
                    kind: BackendKind::Primary,
                    store: Arc::new(store),
                }
            }
            Err(e) => {
                warn!("Redis unavailable: {}. Falling back to in-memory store.", e);
                Selection {
                    kind: BackendKind::Fallback,
                    store: Arc::new(MemoryStore::new()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> StorageSettings {
        // No Redis URL: the probe fails fast without touching the network.
        StorageSettings::default()
    }

    #[tokio::test]
    async fn test_falls_back_when_primary_unconfigured() {
        let selector = StorageSelector::new(unconfigured());

        let store = selector.store().await;

        assert_eq!(store.name(), "memory");
        assert_eq!(selector.backend_kind().await, BackendKind::Fallback);
        assert_eq!(selector.probe_attempts(), 1);
    }

    #[tokio::test]
    async fn test_decision_is_sticky() {
        let selector = StorageSelector::new(unconfigured());

        let first = selector.store().await;
        let second = selector.store().await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(selector.probe_attempts(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_probes_once() {
        let selector = Arc::new(StorageSelector::new(unconfigured()));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let selector = selector.clone();
            handles.push(tokio::spawn(async move { selector.store().await }));
        }

        let mut stores = Vec::new();
        for handle in handles {
            stores.push(handle.await.unwrap());
        }

        assert_eq!(selector.probe_attempts(), 1);
        for store in &stores[1..] {
            assert!(Arc::ptr_eq(&stores[0], store));
        }
    }

    #[tokio::test]
    async fn test_reprobe_disabled_does_not_probe_again() {
        let selector = StorageSelector::new(unconfigured());
        selector.store().await;

        let kind = selector.reprobe().await;

        assert_eq!(kind, BackendKind::Fallback);
        assert_eq!(selector.probe_attempts(), 1);
    }

    #[tokio::test]
    async fn test_reprobe_enabled_reattempts_primary() {
        let settings = StorageSettings {
            reprobe_enabled: true,
            ..StorageSettings::default()
        };
        let selector = StorageSelector::new(settings);
        selector.store().await;
        assert_eq!(selector.probe_attempts(), 1);

        let kind = selector.reprobe().await;

        // Still no Redis URL, so the selection stays on the fallback, but a
        // fresh probe did run.
        assert_eq!(kind, BackendKind::Fallback);
        assert_eq!(selector.probe_attempts(), 2);
    }

    #[tokio::test]
    async fn test_with_store_pins_selection() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let selector = StorageSelector::with_store(store.clone(), BackendKind::Fallback);

        assert!(Arc::ptr_eq(&selector.store().await, &store));
        assert_eq!(selector.probe_attempts(), 0);
    }
}
