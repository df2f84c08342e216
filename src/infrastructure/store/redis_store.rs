//! Redis-backed counter store.

use super::service::{CounterStore, StoreError, StoreResult, WindowSnapshot};
use crate::config::mask_connection_string;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Redis counter store shared by every limiter instance pointing at the same server.
///
/// Uses `ConnectionManager` for connection reuse and transparent reconnects.
/// Errors are returned to the caller; the rate limiter decides how to degrade.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        info!(
            "Connecting to Redis at {}",
            mask_connection_string(redis_url)
        );

        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self { conn: manager })
    }
}

/// Builds the `MULTI INCR [EXPIRE|PEXPIRE] EXEC` batch for one counted request.
///
/// `EXPIRE` only has second resolution, so windows with a sub-second part use
/// `PEXPIRE`, rounded up to a whole millisecond.
///
/// # Errors
///
/// Returns [`StoreError::Command`] if the TTL does not fit the command's
/// signed 64-bit argument; a wrapped negative TTL would delete the key.
fn hit_pipeline(key: &str, expire: Option<Duration>) -> StoreResult<redis::Pipeline> {
    let mut pipe = redis::pipe();
    pipe.atomic().incr(key, 1u64).ignore();

    if let Some(ttl) = expire {
        let out_of_range = || StoreError::Command(format!("TTL {:?} is out of range", ttl));

        if ttl.subsec_nanos() == 0 {
            let secs = i64::try_from(ttl.as_secs()).map_err(|_| out_of_range())?;
            pipe.expire(key, secs).ignore();
        } else {
            let millis =
                i64::try_from(ttl.as_nanos().div_ceil(1_000_000)).map_err(|_| out_of_range())?;
            pipe.pexpire(key, millis).ignore();
        }
    }

    Ok(pipe)
}

#[async_trait]
impl CounterStore for RedisStore {
    async fn get_count(&self, key: &str) -> StoreResult<Option<u64>> {
        let mut conn = self.conn.clone();
        let count = conn.get::<_, Option<u64>>(key).await?;
        debug!("Window GET: {} -> {:?}", key, count);
        Ok(count)
    }

    async fn record_hit(&self, key: &str, expire: Option<Duration>) -> StoreResult<()> {
        let pipe = hit_pipeline(key, expire)?;
        let mut conn = self.conn.clone();
        pipe.query_async::<()>(&mut conn).await?;
        debug!("Window INCR: {} (expire: {:?})", key, expire);
        Ok(())
    }

    async fn inspect(&self, key: &str) -> StoreResult<Option<WindowSnapshot>> {
        let mut conn = self.conn.clone();
        let (count, pttl): (Option<u64>, i64) = redis::pipe()
            .get(key)
            .pttl(key)
            .query_async(&mut conn)
            .await?;

        Ok(count.map(|count| WindowSnapshot {
            count,
            // PTTL is -1 for keys without expiry and -2 for missing keys.
            ttl: u64::try_from(pttl).ok().map(Duration::from_millis),
        }))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
