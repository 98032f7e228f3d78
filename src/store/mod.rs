//! Book storage subsystem.
//!
//! # Data Flow
//! ```text
//! BookService
//!     → BookStore trait
//!         → memory.rs   (DashMap, process-local)
//!         → postgres.rs (sqlx PgPool, `books` table)
//! ```
//!
//! # Design Decisions
//! - One shared handle per process, cloned into every request via `Arc`
//! - No transactions; last writer wins
//! - Ids are assigned by the store and never reused

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::books::model::{Book, BookId, NewBook};
use crate::config::{ServiceConfig, StorageBackend};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Storage failure. Never shown to clients verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence operations over the books table.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, ordered by id.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    async fn get(&self, id: BookId) -> Result<Option<Book>, StoreError>;

    /// Store a new book under a fresh id.
    async fn insert(&self, book: NewBook) -> Result<Book, StoreError>;

    /// Overwrite the row with `book.id`. Returns `false` if there is no such row.
    async fn update(&self, book: &Book) -> Result<bool, StoreError>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: BookId) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Release connections. Called once during shutdown.
    async fn close(&self) {}

    fn backend(&self) -> &'static str;
}

/// Open the store selected by `config.storage.backend`.
pub async fn open(config: &ServiceConfig) -> Result<Arc<dyn BookStore>, StoreError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; books are lost on restart");
            let store: Arc<dyn BookStore> = Arc::new(MemoryStore::new());
            Ok(store)
        }
        StorageBackend::Postgres => {
            let store: Arc<dyn BookStore> =
                Arc::new(PostgresStore::connect(&config.database).await?);
            Ok(store)
        }
    }
}
