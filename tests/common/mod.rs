#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, middleware, routing::get};
use httprate::api::middleware::rate_limit;
use httprate::application::services::{LimiterSettings, RateLimiter};
use httprate::infrastructure::store::{
    CounterStore, MemoryStore, StoreError, StoreResult, WindowSnapshot,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Counts how many requests reached the wrapped handler.
#[derive(Clone, Default)]
pub struct InnerCalls(Arc<AtomicUsize>);

impl InnerCalls {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A router whose only handler sits behind the limiter and records its calls.
pub fn limited_app(limiter: Arc<RateLimiter>) -> (Router, InnerCalls) {
    let calls = InnerCalls::default();
    let counter = calls.0.clone();

    let app = Router::new()
        .route(
            "/resource",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "inner"
                }
            }),
        )
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit::layer));

    (app, calls)
}

pub fn memory_limiter(max_requests: u64) -> (Arc<RateLimiter>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let limiter = RateLimiter::new(
        store.clone(),
        LimiterSettings::new(max_requests, Duration::from_secs(60)),
    )
    .unwrap();
    (Arc::new(limiter), store)
}

/// Store whose every call fails, counting write attempts.
#[derive(Default)]
pub struct FailingStore {
    pub writes: AtomicUsize,
}

#[async_trait]
impl CounterStore for FailingStore {
    async fn get_count(&self, _key: &str) -> StoreResult<Option<u64>> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn record_hit(&self, _key: &str, _expire: Option<Duration>) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn inspect(&self, _key: &str) -> StoreResult<Option<WindowSnapshot>> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// Store whose reads succeed but whose write batch always fails.
pub struct ReadOnlyStore {
    pub count: Option<u64>,
}

#[async_trait]
impl CounterStore for ReadOnlyStore {
    async fn get_count(&self, _key: &str) -> StoreResult<Option<u64>> {
        Ok(self.count)
    }

    async fn record_hit(&self, _key: &str, _expire: Option<Duration>) -> StoreResult<()> {
        Err(StoreError::Command("EXECABORT Transaction discarded".to_string()))
    }

    async fn inspect(&self, _key: &str) -> StoreResult<Option<WindowSnapshot>> {
        Ok(self.count.map(|count| WindowSnapshot { count, ttl: None }))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Store that counts normally but never answers a health check.
#[derive(Default)]
pub struct SilentPingStore {
    inner: MemoryStore,
}

#[async_trait]
impl CounterStore for SilentPingStore {
    async fn get_count(&self, key: &str) -> StoreResult<Option<u64>> {
        self.inner.get_count(key).await
    }

    async fn record_hit(&self, key: &str, expire: Option<Duration>) -> StoreResult<()> {
        self.inner.record_hit(key, expire).await
    }

    async fn inspect(&self, key: &str) -> StoreResult<Option<WindowSnapshot>> {
        self.inner.inspect(key).await
    }

    async fn health_check(&self) -> bool {
        std::future::pending().await
    }
}
