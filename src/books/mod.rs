//! The book resource: entity, payloads, and the operations over them.

pub mod model;
pub mod service;

pub use model::{Book, BookId, BookPatch, InvalidBook, NewBook};
pub use service::{BookService, ServiceError};
