//! Request body limits.
//!
//! Bodies over `security.max_body_size` are rejected with
//! 413 Payload Too Large, up front when `Content-Length` is declared and
//! while reading otherwise.

use axum::extract::DefaultBodyLimit;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::SecurityConfig;

/// Layer that rejects oversized bodies before they are read.
pub fn body_limit_layer(config: &SecurityConfig) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(config.max_body_size)
}

/// Limit applied by body extractors (`Bytes`, `Json`).
pub fn extractor_limit(config: &SecurityConfig) -> DefaultBodyLimit {
    DefaultBodyLimit::max(config.max_body_size)
}
