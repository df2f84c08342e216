//! Stand-in for the protected application.

use axum::http::{Method, Uri};

/// Answers every rate-limited route with a short acknowledgement.
///
/// Deployments put their own handlers behind the limiter; this one only
/// exists so the standalone server has something to protect.
pub async fn upstream_handler(method: Method, uri: Uri) -> String {
    format!("OK {} {}\n", method, uri.path())
}
