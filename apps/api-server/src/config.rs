//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use tollbooth_core::WindowPolicy;
use tollbooth_infra::RedisCounterConfig;

/// What the gate does when the counter store is unreachable.
///
/// There is no implicit default buried in the middleware: the policy is
/// chosen here, once, at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Admit the request and log the fault.
    Open,
    /// Reject all traffic with a server-fault response.
    Closed,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub policy: WindowPolicy,
    pub failure_policy: FailurePolicy,
    /// Set when REDIS_URL is present; otherwise the in-memory backend
    /// is used.
    pub redis: Option<RedisCounterConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let policy = WindowPolicy::new(
            env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            Duration::from_secs(
                env::var("RATE_LIMIT_WINDOW_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(4),
            ),
        );

        let failure_policy = match env::var("RATE_LIMIT_FAIL_POLICY").as_deref() {
            Ok("closed") => FailurePolicy::Closed,
            _ => FailurePolicy::Open,
        };

        let redis = env::var("REDIS_URL")
            .ok()
            .map(|_| RedisCounterConfig::from_env());

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            policy,
            failure_policy,
            redis,
        }
    }
}
