//! Startup orchestration.
//!
//! Order: metrics exporter → storage (with connect retries) → listener →
//! serve. Any failure before serving is fatal.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::store::{self, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("storage: {0}")]
    Store(#[from] StoreError),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid address '{0}'")]
    Address(String),
}

/// Bring the service up and serve until SIGINT/SIGTERM.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let store = store::open(&config).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config, store)
        .run(listener, server_shutdown)
        .await?;
    Ok(())
}
