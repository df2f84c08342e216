//! HTTP server initialization and runtime setup.
//!
//! Handles counter store connection, limiter construction, and Axum server lifecycle.

use crate::application::diagnostics::{Diagnostics, SilentDiagnostics, TracingDiagnostics};
use crate::application::services::RateLimiter;
use crate::config::{Config, DiagnosticsMode};
use crate::infrastructure::store::{CounterStore, MemoryStore, RedisStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Connection attempts made before falling back to the in-memory store.
const REDIS_CONNECT_ATTEMPTS: usize = 4;

const MEMORY_PURGE_INTERVAL: Duration = Duration::from_secs(30);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Counter store (Redis, or in-memory fallback)
/// - Rate limiter with the configured diagnostic sink
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Limiter settings are invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await;

    let diagnostics: Arc<dyn Diagnostics> = match config.diagnostics {
        DiagnosticsMode::Tracing => Arc::new(TracingDiagnostics),
        DiagnosticsMode::Silent => Arc::new(SilentDiagnostics),
    };

    let limiter = RateLimiter::new(store, config.limiter_settings())
        .context("Failed to build rate limiter")?
        .with_diagnostics(diagnostics);

    let state = AppState::new(Arc::new(limiter));
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Connects to Redis with exponential backoff, or returns an in-memory store.
///
/// A Redis that stays unreachable does not prevent startup: the server logs a
/// warning and limits with process-local counters instead.
pub async fn connect_store(config: &Config) -> Arc<dyn CounterStore> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Redis not configured, using in-memory counters");
        return memory_store();
    };

    let strategy = ExponentialBackoff::from_millis(100)
        .map(jitter)
        .take(REDIS_CONNECT_ATTEMPTS - 1);

    match Retry::start(strategy, || RedisStore::connect(redis_url)).await {
        Ok(redis) => {
            tracing::info!("Counter store enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using in-memory counters.", e);
            memory_store()
        }
    }
}

/// Creates an in-memory store and spawns the task that drops closed windows.
fn memory_store() -> Arc<dyn CounterStore> {
    let store = Arc::new(MemoryStore::new());

    let purged = Arc::clone(&store);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(MEMORY_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = purged.purge_expired().await;
            if removed > 0 {
                tracing::debug!("Purged {} closed windows", removed);
            }
        }
    });

    store
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FailurePolicy;

    fn config(redis_url: Option<&str>) -> Config {
        Config {
            redis_url: redis_url.map(str::to_string),
            listen_addr: "127.0.0.1:0".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            max_requests: 10,
            window_seconds: 60,
            key_prefix: "httprate:".to_string(),
            store_timeout_ms: 250,
            failure_policy: FailurePolicy::Open,
            diagnostics: DiagnosticsMode::Silent,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unusable_redis_falls_back_to_memory() {
        let store = connect_store(&config(Some("nope://:s3cret@localhost:6379/0"))).await;

        assert!(store.health_check().await);
        store
            .record_hit("httprate:A", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert_eq!(store.get_count("httprate:A").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_no_redis_uses_memory() {
        let store = connect_store(&config(None)).await;

        store.record_hit("httprate:B", None).await.unwrap();
        assert_eq!(store.get_count("httprate:B").await.unwrap(), Some(1));
    }
}
