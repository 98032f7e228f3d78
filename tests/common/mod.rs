//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use books_api::config::{ServiceConfig, StorageBackend};
use books_api::http::HttpServer;
use books_api::lifecycle::Shutdown;
use books_api::store::{BookStore, MemoryStore};
use tokio::net::TcpListener;

/// A running server and the handle that stops it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

pub fn memory_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.storage.backend = StorageBackend::Memory;
    config
}

/// Start a server on an ephemeral port backed by a fresh in-memory store.
pub async fn start_server(config: ServiceConfig) -> TestServer {
    start_server_with_store(config, Arc::new(MemoryStore::new())).await
}

pub async fn start_server_with_store(config: ServiceConfig, store: Arc<dyn BookStore>) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, store);
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
