//! Application state - shared across all handlers.

use std::sync::Arc;

use tollbooth_core::FixedWindowLimiter;
use tollbooth_core::ports::CounterStore;
use tollbooth_infra::{InMemoryCounterStore, RedisCounterStore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    /// Build the application state with the appropriate counter backend.
    pub async fn new(config: &AppConfig) -> Self {
        let store: Arc<dyn CounterStore> = match &config.redis {
            Some(redis_config) => match RedisCounterStore::new(redis_config.clone()).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to Redis: {}. Using in-memory counter store.",
                        e
                    );
                    Arc::new(InMemoryCounterStore::new())
                }
            },
            None => {
                tracing::warn!(
                    "REDIS_URL not set. Counters are per-process only (in-memory mode)."
                );
                Arc::new(InMemoryCounterStore::new())
            }
        };

        tracing::info!(
            limit = config.policy.limit,
            window_secs = config.policy.window_secs(),
            "Rate limiter initialized"
        );

        Self {
            limiter: Arc::new(FixedWindowLimiter::new(store, config.policy)),
        }
    }
}
