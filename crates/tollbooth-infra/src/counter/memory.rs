//! In-memory counter store - used as fallback when Redis is unavailable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tollbooth_core::ports::{CounterStore, StoreError};

struct WindowSlot {
    count: u64,
    expires_at: Instant,
}

/// In-memory counter store using a HashMap behind an async mutex.
///
/// Keeps the same fixed-window semantics as the Redis backend: the
/// expiry is armed when the key is created and never re-armed within a
/// window. Counters are per-process, not shared across instances, and
/// are lost on restart.
pub struct InMemoryCounterStore {
    slots: Mutex<HashMap<String, WindowSlot>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn incr_in_window(&self, key: &str, window: Duration) -> Result<u64, StoreError> {
        let mut slots = self.slots.lock().await;
        let now = Instant::now();

        match slots.get_mut(key) {
            Some(slot) if slot.expires_at > now => {
                slot.count += 1;
                Ok(slot.count)
            }
            _ => {
                // Absent or expired: fresh window at count 1.
                slots.insert(
                    key.to_string(),
                    WindowSlot {
                        count: 1,
                        expires_at: now + window,
                    },
                );
                Ok(1)
            }
        }
    }
}
