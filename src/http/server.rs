//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the book and health handlers
//! - Wire up middleware (request ID, tracing, CORS, timeout, limits, metrics)
//! - Bind server to listener
//! - Serve until shutdown, then release storage

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::books::BookService;
use crate::config::ServiceConfig;
use crate::health;
use crate::http::handlers::{create_book, delete_book, get_book, list_books, update_book};
use crate::http::request::{request_id_of, MakeRequestUuidV4};
use crate::observability::metrics;
use crate::security::{cors_layer, limits};
use crate::store::BookStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub books: BookService,
}

/// HTTP server for the books API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    store: Arc<dyn BookStore>,
}

impl HttpServer {
    /// Create a new HTTP server over `store`.
    pub fn new(config: ServiceConfig, store: Arc<dyn BookStore>) -> Self {
        let state = AppState {
            books: BookService::new(store.clone()),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            store,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let books = book_routes();
        let base = config.listener.base_path.as_str();
        let api = if base.is_empty() {
            books
        } else {
            Router::new().nest(base, books)
        };

        Router::new()
            .merge(api)
            .merge(health::routes())
            .with_state(state)
            .layer(limits::extractor_limit(&config.security))
            .layer(limits::body_limit_layer(&config.security))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(cors_layer(&config.cors))
            // Outside every layer that can answer on its own (413, 408, preflight).
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request_id_of(request),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then close the store.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            storage = self.store.backend(),
            base_path = %self.config.listener.base_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        self.store.close().await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books).post(create_book).put(update_book))
        .route("/books/", get(list_books).post(create_book).put(update_book))
        .route("/books/{id}", get(get_book).delete(delete_book))
        .route("/books/{id}/", get(get_book).delete(delete_book))
}
