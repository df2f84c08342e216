//! In-process counter store.

use super::service::{CounterStore, StoreError, StoreResult, WindowSnapshot};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: u64,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Counter store kept in process memory.
///
/// Mirrors the Redis command semantics the limiter relies on: a missing or
/// expired key reads as absent, `INCR` creates a key without TTL, and TTLs are
/// only changed by an explicit expire. Reads and writes take the lock
/// separately, so concurrent callers race the same way they do against Redis.
///
/// # Use Cases
///
/// - Development environments without Redis
/// - Tests (works with `tokio::time::pause` for window expiry)
/// - Fallback when the Redis connection fails at startup
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using MemoryStore (counters are local to this process)");
        Self::default()
    }

    /// Drops records whose window has closed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn get_count(&self, key: &str) -> StoreResult<Option<u64>> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.count))
    }

    async fn record_hit(&self, key: &str, expire: Option<Duration>) -> StoreResult<()> {
        let now = Instant::now();
        let expires_at = match expire {
            Some(ttl) => Some(now.checked_add(ttl).ok_or_else(|| {
                StoreError::Command(format!("TTL {:?} is out of range", ttl))
            })?),
            None => None,
        };

        let mut entries = self.entries.lock().await;

        let entry = entries.entry(key.to_string()).or_insert(Entry {
            count: 0,
            expires_at: None,
        });
        if !entry.is_live(now) {
            *entry = Entry {
                count: 0,
                expires_at: None,
            };
        }

        entry.count += 1;
        if expires_at.is_some() {
            entry.expires_at = expires_at;
        }

        Ok(())
    }

    async fn inspect(&self, key: &str) -> StoreResult<Option<WindowSnapshot>> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| WindowSnapshot {
                count: entry.count,
                ttl: entry.expires_at.map(|at| at - now),
            }))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
