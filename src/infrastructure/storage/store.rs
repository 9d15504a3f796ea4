//! Key-value store trait, error types, and backend settings.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing or malformed connection configuration. Never retried.
    #[error("invalid storage configuration: {0}")]
    Configuration(String),

    /// Transport-level failure: connection refused, dropped, or unreachable.
    #[error("storage connection failed: {0}")]
    Connection(String),

    /// An operation exceeded its bounded timeout.
    #[error("storage operation timed out")]
    Timeout,

    /// The backend rejected or failed an operation on an established connection.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StoreError {
    /// Whether the error is worth retrying during startup probing.
    ///
    /// Only network-level failures qualify; configuration errors are
    /// deterministic and surface immediately.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Connection and probing knobs shared by the backends and the selector.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Redis connection URL. `None` means the primary backend cannot be
    /// constructed and the selector goes straight to the fallback.
    pub redis_url: Option<String>,
    /// Namespace prefix applied to every Redis key.
    pub key_prefix: String,
    /// Socket connect timeout for the managed connection.
    pub connect_timeout: Duration,
    /// Per-operation response timeout; also bounds health checks.
    pub operation_timeout: Duration,
    /// Total startup health-check attempts (first try included).
    pub connect_attempts: u32,
    /// Fixed delay between startup health-check attempts.
    pub retry_delay: Duration,
    /// When `true`, an operator-triggered re-probe may promote the selection
    /// back to the primary backend. Off by default: the decision is sticky
    /// for the process lifetime.
    pub reprobe_enabled: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: "link:".to_string(),
            connect_timeout: Duration::from_secs(5),
            operation_timeout: Duration::from_secs(5),
            connect_attempts: 3,
            retry_delay: Duration::from_secs(1),
            reprobe_enabled: false,
        }
    }
}

/// Trait for expiring key-value storage of short link mappings.
///
/// Implementations must be thread-safe. Absence of a key is a normal
/// outcome (`Ok(None)`), never an error; errors are reserved for transport
/// and backend failures and are always surfaced to the caller.
///
/// # Implementations
///
/// - [`crate::infrastructure::storage::RedisStore`] - Redis-backed store with native TTL
/// - [`crate::infrastructure::storage::MemoryStore`] - In-process store with lazy expiry
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stores `value` under `key`, overwriting silently if the key exists.
    ///
    /// A `ttl` of `Some(d)` expires the entry `d` after the write; the TTL is
    /// applied atomically with the write. `None` stores without expiry.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write did not reach the backend.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()>;

    /// Retrieves the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` if present and not expired
    /// - `Ok(None)` if absent or expired
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on transport or backend failure, which the
    /// caller must distinguish from absence.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Removes the entry under `key`, if any.
    ///
    /// Returns `Ok(true)` when an entry was removed; idempotent no-op
    /// (`Ok(false)`) otherwise.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Cheap liveness probe with a bounded timeout. Must not mutate state.
    async fn health_check(&self) -> bool;

    /// Backend identifier for logs and the health endpoint.
    fn name(&self) -> &'static str;
}
