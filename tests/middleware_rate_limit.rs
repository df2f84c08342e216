mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum_test::TestServer;
use common::{FailingStore, ReadOnlyStore, limited_app, memory_limiter};
use httprate::application::diagnostics::TracingDiagnostics;
use httprate::application::services::{LimiterSettings, RateLimiter};
use httprate::domain::FailurePolicy;
use httprate::infrastructure::store::CounterStore;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tower::ServiceExt;

#[tokio::test]
async fn test_requests_without_identity_are_never_limited() {
    let (limiter, store) = memory_limiter(1);
    let (app, calls) = limited_app(limiter);
    let server = TestServer::new(app).unwrap();

    for _ in 0..5 {
        server.get("/resource").await.assert_status_ok();
    }

    assert_eq!(calls.get(), 5);
    assert!(store.get_count("httprate:").await.unwrap().is_none());
}

#[tokio::test]
async fn test_fourth_request_rejected() {
    let (limiter, store) = memory_limiter(3);
    let (app, calls) = limited_app(limiter);
    let server = TestServer::new(app).unwrap();

    for _ in 0..3 {
        let response = server
            .get("/resource")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await;
        response.assert_status_ok();
        assert_eq!(response.text(), "inner");
    }

    let response = server
        .get("/resource")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.text(), "Rate limit exceeded");
    assert!(response.headers().get("retry-after").is_none());
    assert_eq!(calls.get(), 3);

    let snapshot = store.inspect("httprate:203.0.113.7").await.unwrap().unwrap();
    assert_eq!(snapshot.count, 3);
}

#[tokio::test]
async fn test_clients_are_counted_separately() {
    let (limiter, _store) = memory_limiter(1);
    let (app, calls) = limited_app(limiter);
    let server = TestServer::new(app).unwrap();

    server
        .get("/resource")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await
        .assert_status_ok();
    server
        .get("/resource")
        .add_header("X-Forwarded-For", "203.0.113.8")
        .await
        .assert_status_ok();
    server
        .get("/resource")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    assert_eq!(calls.get(), 2);
}

#[tokio::test]
async fn test_edge_header_takes_precedence() {
    let (limiter, store) = memory_limiter(1);
    let (app, _calls) = limited_app(limiter);
    let server = TestServer::new(app).unwrap();

    server
        .get("/resource")
        .add_header("CF-Connecting-IP", "198.51.100.4")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await
        .assert_status_ok();

    // Same edge address behind a different forwarded-for chain is the same client.
    server
        .get("/resource")
        .add_header("CF-Connecting-IP", "198.51.100.4")
        .add_header("X-Forwarded-For", "192.0.2.1")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    assert!(store.get_count("httprate:203.0.113.7").await.unwrap().is_none());
}

#[tokio::test]
async fn test_store_outage_fails_open() {
    let store = Arc::new(FailingStore::default());
    let limiter = RateLimiter::new(
        store.clone(),
        LimiterSettings::new(1, Duration::from_secs(60)),
    )
    .unwrap()
    .with_diagnostics(Arc::new(TracingDiagnostics));
    let (app, calls) = limited_app(Arc::new(limiter));
    let server = TestServer::new(app).unwrap();

    for _ in 0..3 {
        server
            .get("/resource")
            .add_header("X-Forwarded-For", "B")
            .add_header("X-Request-Id", "req-1")
            .await
            .assert_status_ok();
    }

    assert_eq!(calls.get(), 3);
    // A failed read short-circuits before the write batch.
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_store_outage_with_closed_policy() {
    let limiter = RateLimiter::new(
        Arc::new(FailingStore::default()),
        LimiterSettings::new(1, Duration::from_secs(60)).with_failure_policy(FailurePolicy::Closed),
    )
    .unwrap();
    let (app, calls) = limited_app(Arc::new(limiter));
    let server = TestServer::new(app).unwrap();

    let response = server
        .get("/resource")
        .add_header("X-Forwarded-For", "B")
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(calls.get(), 0);

    // Unidentified requests still pass under the closed policy.
    server.get("/resource").await.assert_status_ok();
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn test_failed_write_batch_still_admits() {
    let limiter = RateLimiter::new(
        Arc::new(ReadOnlyStore { count: Some(1) }),
        LimiterSettings::new(2, Duration::from_secs(60)),
    )
    .unwrap();
    let (app, calls) = limited_app(Arc::new(limiter));
    let server = TestServer::new(app).unwrap();

    for _ in 0..3 {
        server
            .get("/resource")
            .add_header("X-Forwarded-For", "C")
            .await
            .assert_status_ok();
    }

    assert_eq!(calls.get(), 3);
}

#[tokio::test]
async fn test_rejection_does_not_mutate_counter() {
    let (limiter, store) = memory_limiter(2);
    let (app, _calls) = limited_app(limiter);
    let server = TestServer::new(app).unwrap();

    for _ in 0..6 {
        server
            .get("/resource")
            .add_header("X-Forwarded-For", "D")
            .await;
    }

    let snapshot = store.inspect("httprate:D").await.unwrap().unwrap();
    assert_eq!(snapshot.count, 2);
    assert!(snapshot.ttl.is_some());
}

#[tokio::test]
async fn test_rejection_response_shape() {
    let (limiter, _store) = memory_limiter(1);
    let (app, _calls) = limited_app(limiter);

    let request = || {
        Request::builder()
            .uri("/resource")
            .header("CF-Connecting-IP", "198.51.100.4")
            .body(Body::empty())
            .unwrap()
    };

    let first = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(request()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        second.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    let body = to_bytes(second.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Rate limit exceeded");
}
