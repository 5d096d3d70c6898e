//! # Tollbooth Core
//!
//! The domain layer of the Tollbooth rate-limit gate.
//! This crate contains the fixed-window decision engine with zero
//! infrastructure dependencies.

pub mod error;
pub mod limiter;
pub mod policy;
pub mod ports;

pub use error::RateLimitError;
pub use limiter::{Decision, FixedWindowLimiter};
pub use policy::WindowPolicy;
