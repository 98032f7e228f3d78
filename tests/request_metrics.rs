//! Request metrics cover responses produced by middleware as well as handlers.
//!
//! Lives in its own test binary because it installs the process-wide recorder.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use books_api::config::{ServiceConfig, StorageBackend};
use books_api::http::HttpServer;
use books_api::store::MemoryStore;
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

fn counter_value(rendered: &str, method: &str, status: u16) -> Option<u64> {
    let method = format!("method=\"{}\"", method);
    let status = format!("status=\"{}\"", status);
    rendered
        .lines()
        .filter(|line| line.starts_with("books_api_requests_total{"))
        .find(|line| line.contains(&method) && line.contains(&status))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}

#[tokio::test]
async fn rejected_and_preflight_requests_are_counted() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    assert!(metrics::set_global_recorder(recorder).is_ok());

    let mut config = ServiceConfig::default();
    config.storage.backend = StorageBackend::Memory;
    config.security.max_body_size = 16;
    let app = HttpServer::new(config, Arc::new(MemoryStore::new())).router();

    let body = r#"{"title": "far too long for the limit", "author": "a", "pages": 1}"#;
    let oversized = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(oversized).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/books")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(preflight).await.unwrap();
    assert!(response.status().is_success());
    let preflight_status = response.status().as_u16();

    let list = Request::builder()
        .uri("/books")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(list).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let rendered = handle.render();
    assert_eq!(counter_value(&rendered, "POST", 413), Some(1), "{rendered}");
    assert_eq!(
        counter_value(&rendered, "OPTIONS", preflight_status),
        Some(1),
        "{rendered}"
    );
    assert_eq!(counter_value(&rendered, "GET", 200), Some(1), "{rendered}");
}
