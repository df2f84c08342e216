//! # httprate
//!
//! Per-client fixed-window rate limiting for Axum, with counters kept in Redis
//! so every instance behind a load balancer enforces the same limit.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Client identity resolution, window keys, decisions
//! - **Application Layer** ([`application`]) - The admission algorithm and diagnostic sinks
//! - **Infrastructure Layer** ([`infrastructure`]) - Counter stores (Redis and in-memory)
//! - **API Layer** ([`api`]) - Axum middleware, health endpoint, guarded routes
//!
//! ## How a request is decided
//!
//! 1. The client is identified by `CF-Connecting-IP`, else `X-Forwarded-For`.
//!    Requests with neither pass through uncounted.
//! 2. The counter at `httprate:<client>` is read. If it already holds the
//!    maximum, the request gets `429 Too Many Requests`.
//! 3. Otherwise the counter is incremented (and given the window as TTL if this
//!    request opened the window) and the request continues.
//!
//! Store failures never take the protected service down: a failed read admits
//! the request (unless the fail-closed policy is configured) and a failed write
//! is logged and ignored.
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"  # Optional
//! export RATE_LIMIT_MAX_REQUESTS=100
//! export RATE_LIMIT_WINDOW_SECONDS=60
//!
//! cargo run
//! ```
//!
//! ## Using the middleware in another service
//!
//! ```rust,ignore
//! use httprate::prelude::*;
//!
//! let store = Arc::new(RedisStore::connect("redis://localhost:6379").await?);
//! let limiter = Arc::new(
//!     RateLimiter::new(store, LimiterSettings::new(100, Duration::from_secs(60)))?
//!         .with_diagnostics(Arc::new(TracingDiagnostics)),
//! );
//!
//! let app = Router::new()
//!     .route("/search", get(search))
//!     .route_layer(middleware::from_fn_with_state(limiter, rate_limit::layer));
//! ```
//!
//! ## Configuration
//!
//! The standalone server is configured from environment variables via
//! [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::api::middleware::rate_limit;
    pub use crate::application::diagnostics::{
        Diagnostics, RequestContext, SilentDiagnostics, StoreStage, TracingDiagnostics,
    };
    pub use crate::application::services::{LimiterSettings, RateLimiter};
    pub use crate::domain::{Decision, FailurePolicy, WindowKey, client_addr};
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::{
        CounterStore, MemoryStore, RedisStore, StoreError, StoreResult, WindowSnapshot,
    };
    pub use crate::state::AppState;
}
