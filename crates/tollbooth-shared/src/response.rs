//! Client-facing response bodies.

use serde::{Deserialize, Serialize};

/// Body of a 429 rejection.
///
/// This shape is part of the public contract: throttled clients parse
/// it to drive their retry countdown, so both fields are always
/// present. `try_after_seconds` is the configured window length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleResponse {
    pub message: String,
    pub try_after_seconds: u64,
}

impl ThrottleResponse {
    pub fn new(try_after_seconds: u64) -> Self {
        Self {
            message: "Too many requests".to_string(),
            try_after_seconds,
        }
    }
}

/// Body of a server-fault response.
///
/// Deliberately a different shape from [`ThrottleResponse`] so clients
/// can tell "you are throttled" apart from "the limiter itself is
/// broken".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A short, human-readable summary of the problem.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn service_unavailable() -> Self {
        Self::new(503, "Service Unavailable")
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_body_matches_the_wire_contract() {
        let body = serde_json::to_value(ThrottleResponse::new(4)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "message": "Too many requests",
                "try_after_seconds": 4
            })
        );
    }

    #[test]
    fn fault_body_is_distinct_from_throttle_body() {
        let body = serde_json::to_value(ErrorResponse::service_unavailable()).unwrap();
        assert!(body.get("try_after_seconds").is_none());
        assert_eq!(body["status"], 503);
    }
}
