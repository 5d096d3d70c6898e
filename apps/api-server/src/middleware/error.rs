//! Error boundary - maps gate outcomes to client-facing responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;
use std::time::Duration;
use tollbooth_shared::{ErrorResponse, ThrottleResponse};

/// Application-level error type rendered at the pipeline edge.
///
/// `Throttled` and `StoreUnavailable` deliberately produce different
/// status codes and body shapes (429 vs 503), so a client can tell
/// being rate limited apart from the limiter being broken.
#[derive(Debug)]
pub enum AppError {
    Throttled { try_after: Duration },
    StoreUnavailable,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Throttled { try_after } => {
                write!(f, "Too many requests, try after {}s", try_after.as_secs())
            }
            AppError::StoreUnavailable => write!(f, "Counter store unavailable"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Throttled { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Throttled { try_after } => {
                let secs = try_after.as_secs();
                HttpResponse::TooManyRequests()
                    .insert_header(("Retry-After", secs.to_string()))
                    .insert_header(("X-RateLimit-Remaining", "0"))
                    .json(ThrottleResponse::new(secs))
            }
            AppError::StoreUnavailable => HttpResponse::ServiceUnavailable().json(
                ErrorResponse::service_unavailable()
                    .with_detail("Rate limiter backend is unreachable"),
            ),
        }
    }
}
