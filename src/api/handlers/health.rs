//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse, LimitsInfo};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health` (not rate limited)
///
/// # Response Codes
///
/// - **200 OK**: Counter store reachable
/// - **503 Service Unavailable**: Counter store unreachable; the limiter is
///   currently failing open (or closed, depending on policy)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Counter store reachable" }
///   },
///   "limits": {
///     "max_requests": 100,
///     "window_seconds": 60.0,
///     "failure_policy": "open"
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;
    let healthy = store_check.status == "ok";

    let settings = state.limiter.settings();
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { store: store_check },
        limits: LimitsInfo {
            max_requests: settings.max_requests,
            window_seconds: settings.window.as_secs_f64(),
            failure_policy: settings.failure_policy.to_string(),
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks counter store connectivity, bounded by the limiter's store timeout.
async fn check_store(state: &AppState) -> CheckStatus {
    let reachable = tokio::time::timeout(
        state.limiter.settings().store_timeout,
        state.limiter.store().health_check(),
    )
    .await
    .unwrap_or(false);

    if reachable {
        CheckStatus {
            status: "ok".to_string(),
            message: Some("Counter store reachable".to_string()),
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Counter store unreachable".to_string()),
        }
    }
}
