//! Redis counter store - the shared fixed-window backend.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Script};

use tollbooth_core::ports::{CounterStore, StoreError};

/// Redis counter store configuration.
#[derive(Debug, Clone)]
pub struct RedisCounterConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Per-operation timeout applied to every increment
    pub op_timeout: Duration,
    /// Key prefix for counter keys
    pub key_prefix: String,
}

impl Default for RedisCounterConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            op_timeout: Duration::from_secs(2),
            key_prefix: "ratelimit".to_string(),
        }
    }
}

impl RedisCounterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            op_timeout: Duration::from_secs(
                std::env::var("REDIS_OP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            ),
            key_prefix: std::env::var("RATE_LIMIT_KEY_PREFIX")
                .unwrap_or_else(|_| "ratelimit".to_string()),
        }
    }
}

/// Redis-backed counter store.
///
/// The create-with-expiry and increment steps run as one Lua script, so
/// the window expiry is armed atomically with the first increment via
/// SET NX EX rather than a client-side "count == 1" check. A trailing
/// TTL guard repairs any key that lost its expiry, which would
/// otherwise throttle that client forever.
pub struct RedisCounterStore {
    conn: ConnectionManager,
    config: RedisCounterConfig,
    script: Script,
}

const INCR_IN_WINDOW: &str = r#"
local key = KEYS[1]
local window = tonumber(ARGV[1])

redis.call('SET', key, 0, 'NX', 'EX', window)
local count = redis.call('INCR', key)

if redis.call('TTL', key) == -1 then
    redis.call('EXPIRE', key, window)
end

return count
"#;

impl RedisCounterStore {
    pub async fn new(config: RedisCounterConfig) -> Result<Self, StoreError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client);
        let conn = tokio::time::timeout(config.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| StoreError::Connection("connection timed out".to_string()))?
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let script = Script::new(INCR_IN_WINDOW);

        tracing::info!(url = %config.url, "Connected to Redis counter store");

        Ok(Self {
            conn,
            config,
            script,
        })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, StoreError> {
        Self::new(RedisCounterConfig::from_env()).await
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}:{}", self.config.key_prefix, key)
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr_in_window(&self, key: &str, window: Duration) -> Result<u64, StoreError> {
        let redis_key = self.make_key(key);
        let mut conn = self.conn.clone();

        let mut invocation = self.script.key(&redis_key);
        invocation.arg(window.as_secs().max(1));

        let count: i64 = tokio::time::timeout(
            self.config.op_timeout,
            invocation.invoke_async(&mut conn),
        )
        .await
        .map_err(|_| StoreError::Timeout)?
        .map_err(|e| StoreError::Operation(e.to_string()))?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests need a reachable Redis; they no-op otherwise.
    async fn get_test_store(prefix: &str) -> Option<RedisCounterStore> {
        let config = RedisCounterConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(1),
            op_timeout: Duration::from_secs(1),
            key_prefix: format!("test_ratelimit_{prefix}"),
        };

        RedisCounterStore::new(config).await.ok()
    }

    #[tokio::test]
    async fn test_incr_sequence_and_reset() {
        let store = match get_test_store("seq").await {
            Some(s) => s,
            None => return,
        };

        let window = Duration::from_secs(1);
        let key = "10.0.0.1";

        for expected in 1..=3i64 {
            let count = store.incr_in_window(key, window).await.unwrap();
            assert_eq!(count, expected as u64);
        }

        // Wait for the key to expire, then the counter starts over.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let count = store.incr_in_window(key, window).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let store = match get_test_store("iso").await {
            Some(s) => s,
            None => return,
        };

        let window = Duration::from_secs(2);
        store.incr_in_window("client_a", window).await.unwrap();
        store.incr_in_window("client_a", window).await.unwrap();

        let count = store.incr_in_window("client_b", window).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_a_connection_error() {
        let config = RedisCounterConfig {
            url: "redis://127.0.0.1:1".to_string(),
            connect_timeout: Duration::from_millis(200),
            op_timeout: Duration::from_millis(200),
            key_prefix: "test_ratelimit_err".to_string(),
        };

        let err = RedisCounterStore::new(config).await.err().unwrap();
        assert!(matches!(err, StoreError::Connection(_)));
    }
}
