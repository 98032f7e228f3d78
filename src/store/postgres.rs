//! PostgreSQL-backed book store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};

use crate::books::model::{Book, BookId, NewBook};
use crate::config::DatabaseConfig;
use crate::store::{BookStore, StoreError};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS books (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    pages INTEGER NOT NULL
)";

/// Store over the `books` table.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect, retrying while the database comes up, then bootstrap the
    /// schema if `auto_migrate` is set.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = connect_options(config);
        let attempts = config.connect_retries.max(1);
        let delay = Duration::from_secs(config.retry_delay_secs);

        let mut attempt = 0;
        let pool = loop {
            attempt += 1;
            let result = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
                .connect_with(options.clone())
                .await;

            match result {
                Ok(pool) => break pool,
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Waiting for database to be ready..."
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(attempts, error = %e, "Unable to connect to database");
                    return Err(e.into());
                }
            }
        };

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to database"
        );

        let store = Self { pool };
        if config.auto_migrate {
            store.migrate().await?;
        }
        Ok(store)
    }

    /// Create the `books` table if it does not exist.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        tracing::debug!("books table ensured");
        Ok(())
    }
}

fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .database(&config.database)
        .application_name(&config.application_name)
        .ssl_mode(PgSslMode::Disable);
    if !config.password.is_empty() {
        options = options.password(&config.password);
    }
    options
}

#[async_trait]
impl BookStore for PostgresStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, pages FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn get(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, pages FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let id: BookId = sqlx::query_scalar(
            "INSERT INTO books (title, author, pages) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.pages)
        .fetch_one(&self.pool)
        .await?;
        Ok(book.into_book(id))
    }

    async fn update(&self, book: &Book) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE books SET title = $1, author = $2, pages = $3 WHERE id = $4",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.pages)
        .bind(book.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: BookId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        tracing::info!("Closing database connection...");
        self.pool.close().await;
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
