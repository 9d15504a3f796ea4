//! Pluggable key-value storage for short link mappings.
//!
//! Provides a [`KeyValueStore`] trait with two implementations:
//! - [`RedisStore`] - Production Redis-backed store with managed connection
//! - [`MemoryStore`] - In-process fallback for development and degraded mode
//!
//! [`StorageSelector`] decides once per process which implementation serves
//! requests, preferring Redis and falling back to the in-memory store when
//! the primary cannot be constructed.

mod memory_store;
mod redis_store;
mod selector;
mod store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use selector::{BackendKind, StorageSelector};
pub use store::{KeyValueStore, StorageSettings, StoreError, StoreResult};

#[cfg(test)]
pub use store::MockKeyValueStore;
