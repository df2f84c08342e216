//! Fixed-window admission decisions against a shared counter store.

use crate::application::diagnostics::{Diagnostics, RequestContext, SilentDiagnostics, StoreStage};
use crate::domain::{
    DEFAULT_KEY_PREFIX, Decision, FailurePolicy, WindowKey, client_addr, request_id,
};
use crate::error::SettingsError;
use crate::infrastructure::store::{CounterStore, StoreError, StoreResult};
use axum::http::HeaderMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Longest accepted window. Keeps TTLs representable for Redis `PEXPIRE`
/// and for the in-memory clock.
pub const MAX_WINDOW: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Default bound on a single store round trip.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(250);

/// Limits and policies applied by a [`RateLimiter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimiterSettings {
    pub max_requests: u64,
    pub window: Duration,
    pub key_prefix: String,
    pub store_timeout: Duration,
    pub failure_policy: FailurePolicy,
}

impl LimiterSettings {
    /// Creates settings allowing `max_requests` per `window`, with default
    /// key prefix, store timeout and fail-open policy.
    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
            failure_policy: FailurePolicy::Open,
        }
    }

    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Checks that every limit is positive and the prefix is non-empty.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_requests == 0 {
            return Err(SettingsError::ZeroMaxRequests);
        }
        if self.window.is_zero() {
            return Err(SettingsError::ZeroWindow);
        }
        if self.window > MAX_WINDOW {
            return Err(SettingsError::WindowTooLarge(MAX_WINDOW));
        }
        if self.key_prefix.is_empty() {
            return Err(SettingsError::EmptyKeyPrefix);
        }
        if self.store_timeout.is_zero() {
            return Err(SettingsError::ZeroStoreTimeout);
        }
        Ok(())
    }
}

/// Per-client fixed-window rate limiter.
///
/// Immutable after construction and meant to be shared behind an `Arc` by every
/// request task. The limiter holds no counters itself; the [`CounterStore`] is
/// the only coordination point.
///
/// # Protocol
///
/// 1. Resolve the client identity; none means admit without counting
/// 2. `GET` the window key (absent reads as 0)
/// 3. If the count is already at `max_requests`, reject without writing
/// 4. `INCR` the key, plus `EXPIRE` it when the count was 0, in one batch
/// 5. Admit, whatever the batch returned
///
/// Steps 2 and 4 are separate round trips. Two requests that both read
/// `max_requests - 1` are both admitted, so a window can overshoot by one
/// request per concurrent race.
///
/// # Store failures
///
/// Every store call is bounded by `store_timeout`. A failed or timed-out read
/// is resolved by the [`FailurePolicy`]; a failed write is reported and ignored.
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    settings: LimiterSettings,
    diagnostics: Arc<dyn Diagnostics>,
}

impl RateLimiter {
    /// Creates a silent limiter over `store`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the settings fail validation.
    pub fn new(
        store: Arc<dyn CounterStore>,
        settings: LimiterSettings,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            store,
            settings,
            diagnostics: Arc::new(SilentDiagnostics),
        })
    }

    /// Replaces the diagnostic sink.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn settings(&self) -> &LimiterSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn CounterStore> {
        &self.store
    }

    /// Builds the store key for a client identity.
    pub fn window_key(&self, client_addr: &str) -> WindowKey {
        WindowKey::new(&self.settings.key_prefix, client_addr)
    }

    /// Decides whether a request with these headers may proceed, and counts it
    /// if so.
    pub async fn evaluate(&self, headers: &HeaderMap) -> Decision {
        let request_id = request_id(headers);

        match client_addr(headers) {
            Some(addr) => self.check(&addr, request_id.as_deref()).await,
            None => {
                self.diagnostics.unresolved(request_id.as_deref());
                Decision::Admit
            }
        }
    }

    /// Runs the window protocol for a resolved client identity.
    pub async fn check(&self, client_addr: &str, request_id: Option<&str>) -> Decision {
        let key = self.window_key(client_addr);
        let ctx = RequestContext {
            key: &key,
            request_id,
        };

        let current = match self.bounded(self.store.get_count(key.as_str())).await {
            Ok(count) => count.unwrap_or(0),
            Err(e) => {
                self.diagnostics.store_error(&ctx, StoreStage::Read, &e);
                return match self.settings.failure_policy {
                    FailurePolicy::Open => Decision::Admit,
                    FailurePolicy::Closed => Decision::Unavailable,
                };
            }
        };

        if current >= self.settings.max_requests {
            self.diagnostics.rejected(&ctx, current);
            return Decision::Reject;
        }

        // Only the request that opens the window sets its TTL.
        let expire = (current == 0).then_some(self.settings.window);
        if let Err(e) = self
            .bounded(self.store.record_hit(key.as_str(), expire))
            .await
        {
            self.diagnostics.store_error(&ctx, StoreStage::Write, &e);
        }

        self.diagnostics.admitted(&ctx, current);
        Decision::Admit
    }

    async fn bounded<T>(&self, call: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        tokio::time::timeout(self.settings.store_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.settings.store_timeout))?
    }
}
