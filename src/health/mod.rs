//! Liveness and readiness checks.
//!
//! `/health` answers as long as the process serves HTTP. `/health/ready`
//! additionally round-trips to storage, so orchestrators hold traffic back
//! while the database is unreachable.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessStatus {
    pub status: &'static str,
    pub storage: &'static str,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(liveness))
        .route("/health/ready", get(readiness))
}

pub async fn liveness() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessStatus>) {
    let store = state.books.store();
    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessStatus {
                status: "ready",
                storage: store.backend(),
            }),
        ),
        Err(e) => {
            tracing::warn!(storage = store.backend(), error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessStatus {
                    status: "unavailable",
                    storage: store.backend(),
                }),
            )
        }
    }
}
