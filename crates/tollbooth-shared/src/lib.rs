//! # Tollbooth Shared
//!
//! Wire types shared between the gate and its clients.

pub mod response;

pub use response::{ErrorResponse, ThrottleResponse};
