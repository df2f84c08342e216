//! Shared window counter store.
//!
//! Provides a [`CounterStore`] trait with two implementations:
//! - [`RedisStore`] - Production Redis-backed counters shared by every instance
//! - [`MemoryStore`] - In-process counters for tests and single-instance deployments

mod memory_store;
mod redis_store;
mod service;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use service::{CounterStore, StoreError, StoreResult, WindowSnapshot};

#[cfg(test)]
pub use service::MockCounterStore;
