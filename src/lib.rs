//! Books API Library
//!
//! A small CRUD service for a single `Book` resource backed by PostgreSQL
//! (or an in-memory map for development), plus a typed HTTP client.

pub mod books;
pub mod client;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod store;

pub use books::{Book, BookId, BookPatch, BookService, NewBook};
pub use client::BooksClient;
pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
