//! Window policy - the two process-wide rate-limit constants.

use std::time::Duration;

/// Fixed-window rate-limit policy.
///
/// Immutable after startup; constructed once and passed by reference
/// into the limiter. No runtime mutation path exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    /// Maximum admitted requests per window.
    pub limit: u32,
    /// Window duration, also used as the retry hint on rejection.
    pub window: Duration,
}

impl WindowPolicy {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }

    /// Window length in whole seconds, as carried by the store TTL and
    /// the `try_after_seconds` field of a rejection.
    pub fn window_secs(&self) -> u64 {
        self.window.as_secs()
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            limit: 3,
            window: Duration::from_secs(4),
        }
    }
}
