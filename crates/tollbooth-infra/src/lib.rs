//! # Tollbooth Infrastructure
//!
//! Concrete counter store backends for the port defined in
//! `tollbooth-core`.
//!
//! ## Feature Flags
//!
//! - `redis` (default) - Redis-backed counter store, shared across gate
//!   instances
//!
//! The in-memory backend is always available; it keeps the same window
//! semantics but is per-process only.

pub mod counter;

pub use counter::InMemoryCounterStore;

#[cfg(feature = "redis")]
pub use counter::{RedisCounterConfig, RedisCounterStore};
