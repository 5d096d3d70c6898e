//! Domain-level error types.

use thiserror::Error;

use crate::ports::StoreError;

/// Errors a rate-limit check can surface to the pipeline.
///
/// A rejected request is NOT an error - it is a normal [`Decision`]
/// outcome and never appears here.
///
/// [`Decision`]: crate::limiter::Decision
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// The counter store could not be reached or failed mid-operation.
    /// The pipeline's error boundary decides admission (fail-open vs
    /// fail-closed); the limiter itself never guesses.
    #[error("counter store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}
