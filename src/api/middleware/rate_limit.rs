//! Rate limiting middleware using fixed-window counters in a shared store.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::application::services::RateLimiter;
use crate::domain::Decision;
use crate::error::AppError;

/// Admits or rejects a request before it reaches the wrapped handler.
///
/// # Client Identity
///
/// Read from `CF-Connecting-IP`, falling back to `X-Forwarded-For`. Requests
/// carrying neither are passed through without being counted.
///
/// # Responses
///
/// - Admitted requests get the inner handler's response, untouched
/// - `429 Too Many Requests` with body `Rate limit exceeded` once the client's
///   window is full; the inner handler is not called
/// - `503 Service Unavailable` only under the fail-closed policy when the
///   counter store cannot be read
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::rate_limit;
///
/// let limited = Router::new()
///     .route("/search", get(search_handler))
///     .route_layer(middleware::from_fn_with_state(limiter.clone(), rate_limit::layer));
/// ```
pub async fn layer(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    match limiter.evaluate(req.headers()).await {
        Decision::Admit => Ok(next.run(req).await),
        Decision::Reject => Err(AppError::RateLimited),
        Decision::Unavailable => Err(AppError::LimiterUnavailable),
    }
}
