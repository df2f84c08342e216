//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`   - Health check: counter store and active limits (not limited)
//! - `ANY  /*`        - Upstream routes, behind the rate limiter
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging for every route
//! - **Rate limiting** - Per-client fixed window, upstream routes only

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let limited = api::routes::limited_routes().route_layer(middleware::from_fn_with_state(
        state.limiter.clone(),
        rate_limit::layer,
    ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(limited)
        .with_state(state)
        .layer(tracing::layer())
}
