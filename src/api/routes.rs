//! Routes served behind the rate limiter.

use crate::api::handlers::upstream_handler;
use crate::state::AppState;
use axum::{Router, routing::any};

/// Every path except those registered elsewhere, answered by
/// [`upstream_handler`].
///
/// # Endpoints
///
/// - `ANY /`         - Upstream root
/// - `ANY /{*path}`  - Any other upstream path
pub fn limited_routes() -> Router<AppState> {
    Router::new()
        .route("/", any(upstream_handler))
        .route("/{*path}", any(upstream_handler))
}
