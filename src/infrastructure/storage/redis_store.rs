//! Redis-backed store implementation.

use super::store::{KeyValueStore, StorageSettings, StoreError, StoreResult};
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use std::future::Future;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, info, warn};

/// Redis store implementation for short link mappings.
///
/// Wraps a managed, multiplexed connection (`ConnectionManager`) that owns
/// reconnection and keep-alive; the handle is never shared except through
/// this store. Unlike a read-through cache, every failure surfaces to the
/// caller as a typed [`StoreError`] so the service layer can decide how to
/// react.
#[derive(Debug)]
pub struct RedisStore {
    client: ConnectionManager,
    key_prefix: String,
    operation_timeout: Duration,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// Construction protocol: open the client (a missing or malformed URL is
    /// a [`StoreError::Configuration`] and is never retried), build the
    /// managed connection with the configured connect/response timeouts, then
    /// probe with PING. The probe is retried at a fixed interval for up to
    /// `settings.connect_attempts` total attempts, but only on transient
    /// network errors.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] for bad connection info, or a
    /// transient [`StoreError`] if the server stays unreachable after all
    /// attempts.
    pub async fn connect(settings: &StorageSettings) -> StoreResult<Self> {
        let url = settings
            .redis_url
            .as_deref()
            .ok_or_else(|| StoreError::Configuration("no Redis URL configured".to_string()))?;

        info!("Connecting to Redis at {}", url);

        let client = Client::open(url)
            .map_err(|e| StoreError::Configuration(format!("invalid Redis URL: {}", e)))?;

        // Reconnect retries inside the manager stay small; startup probing
        // below carries the configurable retry policy.
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Some(settings.connect_timeout))
            .set_response_timeout(Some(settings.operation_timeout))
            .set_number_of_retries(2);

        let manager = ConnectionManager::new_with_config(client, manager_config)
            .await
            .map_err(map_redis_error)?;

        let store = Self {
            client: manager,
            key_prefix: settings.key_prefix.clone(),
            operation_timeout: settings.operation_timeout,
        };

        store.ping_with_retry(settings).await?;

        info!("✓ Connected to Redis");

        Ok(store)
    }

    /// PING probe retried on transient errors at a fixed interval.
    async fn ping_with_retry(&self, settings: &StorageSettings) -> StoreResult<()> {
        let retries = settings.connect_attempts.saturating_sub(1) as usize;
        let strategy = FixedInterval::new(settings.retry_delay).take(retries);

        RetryIf::spawn(
            strategy,
            || self.ping(),
            |e: &StoreError| {
                let transient = e.is_transient();
                if transient {
                    warn!("Redis health check failed, retrying: {}", e);
                }
                transient
            },
        )
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.client.clone();
        self.bounded(async move { conn.ping::<()>().await }).await
    }

    /// Runs a Redis operation under the configured response timeout.
    async fn bounded<T>(
        &self,
        operation: impl Future<Output = redis::RedisResult<T>>,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.operation_timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(map_redis_error(e)),
            Err(_) => Err(StoreError::Timeout),
        }
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()> {
        let key = self.build_key(key);
        let mut conn = self.client.clone();

        match ttl {
            // SET with EX in one command; a separate EXPIRE would leave a
            // window where the entry has no expiry.
            Some(ttl) => {
                let seconds = ttl.as_secs().max(1);
                let key_for_op = key.clone();
                self.bounded(async move { conn.set_ex::<_, _, ()>(&key_for_op, value, seconds).await })
                    .await?;
                debug!("SET {} (TTL: {}s)", key, seconds);
            }
            None => {
                let key_for_op = key.clone();
                self.bounded(async move { conn.set::<_, _, ()>(&key_for_op, value).await })
                    .await?;
                debug!("SET {} (no TTL)", key);
            }
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let key = self.build_key(key);
        let mut conn = self.client.clone();

        let key_for_op = key.clone();
        let value: Option<String> = self
            .bounded(async move { conn.get(&key_for_op).await })
            .await?;

        match &value {
            Some(_) => debug!("GET {} -> hit", key),
            None => debug!("GET {} -> absent", key),
        }

        Ok(value)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let key = self.build_key(key);
        let mut conn = self.client.clone();

        let deleted: i32 = self
            .bounded(async move { conn.del(&key).await })
            .await?;

        Ok(deleted > 0)
    }

    async fn health_check(&self) -> bool {
        self.ping().await.is_ok()
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// Classifies a Redis error into the store taxonomy.
fn map_redis_error(e: redis::RedisError) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout
    } else if e.is_connection_refusal() || e.is_connection_dropped() || e.is_io_error() {
        StoreError::Connection(e.to_string())
    } else {
        StoreError::Operation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings(url: Option<&str>) -> StorageSettings {
        StorageSettings {
            redis_url: url.map(String::from),
            connect_timeout: Duration::from_millis(200),
            operation_timeout: Duration::from_millis(200),
            connect_attempts: 1,
            retry_delay: Duration::from_millis(10),
            ..StorageSettings::default()
        }
    }

    #[tokio::test]
    async fn test_connect_without_url_is_configuration_error() {
        let err = RedisStore::connect(&test_settings(None)).await.unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_connect_with_malformed_url_is_configuration_error() {
        let err = RedisStore::connect(&test_settings(Some("not-a-redis-url")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_server_is_transient() {
        // Port 1 is reserved and closed on any sane machine.
        let err = RedisStore::connect(&test_settings(Some("redis://127.0.0.1:1/0")))
            .await
            .unwrap_err();
        assert!(err.is_transient(), "expected transient error, got {err:?}");
    }
}
