//! Fixed-window rate limiter - the admit-or-reject decision engine.

use std::sync::Arc;
use std::time::Duration;

use crate::error::RateLimitError;
use crate::policy::WindowPolicy;
use crate::ports::CounterStore;

/// Sentinel key used when identity resolution produced nothing.
/// A request is never exempted from the check just because its source
/// address could not be determined.
pub const UNKNOWN_KEY: &str = "unknown";

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Request admitted; `count` is the store-reported position within
    /// the current window (1-based, monotonically non-decreasing).
    Admitted { count: u64 },
    /// Request rejected. `try_after` is always the full window length,
    /// not the time remaining until the counter expires.
    Rejected { try_after: Duration },
}

impl Decision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admitted { .. })
    }
}

/// Fixed-window limiter keyed by client identity.
///
/// Every check round-trips to the counter store - deliberately no local
/// caching of counts, so the decision stays correct when several gate
/// instances share one store.
pub struct FixedWindowLimiter {
    store: Arc<dyn CounterStore>,
    policy: WindowPolicy,
}

impl FixedWindowLimiter {
    pub fn new(store: Arc<dyn CounterStore>, policy: WindowPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    /// Check one request against the window for `key`.
    ///
    /// Increments the key's counter in the store (arming the window
    /// expiry on creation) and compares the returned count to the
    /// configured limit. An empty key falls back to [`UNKNOWN_KEY`].
    ///
    /// A store failure surfaces as [`RateLimitError::StoreUnavailable`];
    /// this method never converts a failed store call into a silent
    /// admit or reject.
    pub async fn check(&self, key: &str) -> Result<Decision, RateLimitError> {
        let key = if key.is_empty() { UNKNOWN_KEY } else { key };

        let count = self.store.incr_in_window(key, self.policy.window).await?;

        if count > u64::from(self.policy.limit) {
            Ok(Decision::Rejected {
                try_after: self.policy.window,
            })
        } else {
            Ok(Decision::Admitted { count })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::StoreError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Counting stub - window semantics without the clock.
    struct CountingStore {
        counts: Mutex<HashMap<String, u64>>,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                counts: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl CounterStore for CountingStore {
        async fn incr_in_window(&self, key: &str, _window: Duration) -> Result<u64, StoreError> {
            let mut counts = self.counts.lock().unwrap();
            let count = counts.entry(key.to_string()).or_insert(0);
            *count += 1;
            Ok(*count)
        }
    }

    struct UnavailableStore;

    #[async_trait]
    impl CounterStore for UnavailableStore {
        async fn incr_in_window(&self, _key: &str, _window: Duration) -> Result<u64, StoreError> {
            Err(StoreError::Timeout)
        }
    }

    fn limiter_with(store: Arc<dyn CounterStore>) -> FixedWindowLimiter {
        FixedWindowLimiter::new(store, WindowPolicy::new(3, Duration::from_secs(4)))
    }

    #[tokio::test]
    async fn admits_up_to_limit_then_rejects() {
        let limiter = limiter_with(Arc::new(CountingStore::new()));

        for expected in 1..=3u64 {
            let decision = limiter.check("10.0.0.1").await.unwrap();
            assert_eq!(decision, Decision::Admitted { count: expected });
        }

        let decision = limiter.check("10.0.0.1").await.unwrap();
        assert_eq!(
            decision,
            Decision::Rejected {
                try_after: Duration::from_secs(4)
            }
        );
    }

    #[tokio::test]
    async fn rejection_hint_is_full_window_not_remaining_time() {
        let limiter = limiter_with(Arc::new(CountingStore::new()));

        // Drive the key past the limit twice; both rejections carry the
        // configured window length.
        for _ in 0..5 {
            let _ = limiter.check("k").await.unwrap();
        }
        for _ in 0..2 {
            match limiter.check("k").await.unwrap() {
                Decision::Rejected { try_after } => {
                    assert_eq!(try_after, Duration::from_secs(4))
                }
                other => panic!("expected rejection, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn distinct_keys_do_not_interfere() {
        let limiter = limiter_with(Arc::new(CountingStore::new()));

        for _ in 0..3 {
            assert!(limiter.check("10.0.0.1").await.unwrap().is_admitted());
        }
        assert!(!limiter.check("10.0.0.1").await.unwrap().is_admitted());

        // A different client still starts at count 1.
        assert_eq!(
            limiter.check("10.0.0.2").await.unwrap(),
            Decision::Admitted { count: 1 }
        );
    }

    #[tokio::test]
    async fn empty_key_falls_back_to_sentinel() {
        let store = Arc::new(CountingStore::new());
        let limiter = limiter_with(store.clone());

        limiter.check("").await.unwrap();
        limiter.check("").await.unwrap();

        let counts = store.counts.lock().unwrap();
        assert_eq!(counts.get(UNKNOWN_KEY), Some(&2));
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_unavailable() {
        let limiter = limiter_with(Arc::new(UnavailableStore));

        let err = limiter.check("10.0.0.1").await.unwrap_err();
        assert!(matches!(err, RateLimitError::StoreUnavailable(_)));
    }
}
