//! Counter store port.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Counter store trait - abstraction over the shared key-value store
/// holding per-key window counters.
///
/// The store owns all cross-request state. Counters live there and only
/// there; the limiter keeps nothing in process memory, so any number of
/// gate instances behind a load balancer observe the same counts.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter for `key` and return the
    /// post-increment count.
    ///
    /// If the key is absent, the store creates it at zero with an
    /// expiry of `window` before incrementing, as a single atomic
    /// unit with respect to concurrent callers. An existing key is
    /// incremented without touching its expiry, so the window runs
    /// from first use. When the expiry elapses the key vanishes and
    /// the next call starts a fresh window at count 1.
    async fn incr_in_window(&self, key: &str, window: Duration) -> Result<u64, StoreError>;
}

/// Counter store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("operation failed: {0}")]
    Operation(String),

    #[error("operation timed out")]
    Timeout,
}
