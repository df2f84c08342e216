//! Counter store trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the counter store.
///
/// A missing key is never an error: reads return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store command error: {0}")]
    Command(String),

    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_connection_dropped() || e.is_connection_refusal() || e.is_io_error() {
            Self::Connection(e.to_string())
        } else {
            Self::Command(e.to_string())
        }
    }
}

/// Result type for counter store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Point-in-time view of a window counter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub count: u64,
    /// Remaining lifetime of the window, `None` when the record has no expiry.
    pub ttl: Option<Duration>,
}

/// Atomic key-value counter service backing the rate limiter.
///
/// This is the only synchronization point between concurrent request
/// evaluations. Implementations must be safe to call from many tasks at once;
/// `get_count` and `record_hit` are separate round trips, so a caller that reads
/// and then writes can race with other callers.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - `GET` / `MULTI INCR EXPIRE EXEC`
/// - [`crate::infrastructure::store::MemoryStore`] - process-local map with TTLs
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Reads the current counter value for `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(count))` when the window record exists
    /// - `Ok(None)` when the key is absent (no open window)
    ///
    /// # Errors
    ///
    /// Any failure other than key absence, including a stored value that is
    /// not an integer.
    async fn get_count(&self, key: &str) -> StoreResult<Option<u64>>;

    /// Increments the counter for `key` by one and, when `expire` is set, sets
    /// the record's TTL, in a single round trip.
    ///
    /// The increment alone never touches an existing TTL.
    async fn record_hit(&self, key: &str, expire: Option<Duration>) -> StoreResult<()>;

    /// Reads counter value and remaining TTL together, for operator tooling.
    async fn inspect(&self, key: &str) -> StoreResult<Option<WindowSnapshot>>;

    /// Checks if the store backend is reachable.
    async fn health_check(&self) -> bool;
}
