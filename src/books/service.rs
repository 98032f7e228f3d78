//! Book operations on top of a [`BookStore`].

use std::sync::Arc;

use thiserror::Error;

use crate::books::model::{Book, BookId, BookPatch, InvalidBook, NewBook};
use crate::store::{BookStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("book {0} not found")]
    NotFound(BookId),

    #[error("the id was not provided")]
    MissingId,

    #[error("invalid book: {0}")]
    Invalid(#[from] InvalidBook),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validation and partial-update logic shared by every transport.
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn BookStore> {
        &self.store
    }

    pub async fn list(&self) -> Result<Vec<Book>, ServiceError> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: BookId) -> Result<Book, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    pub async fn create(&self, book: NewBook) -> Result<Book, ServiceError> {
        book.validate()?;
        let created = self.store.insert(book).await?;
        tracing::info!(id = created.id, "Book created");
        Ok(created)
    }

    /// Merge the fields present in `patch` into the stored book.
    pub async fn update(&self, patch: BookPatch) -> Result<Book, ServiceError> {
        let id = match patch.id {
            Some(id) if id != 0 => id,
            _ => return Err(ServiceError::MissingId),
        };

        let mut book = self.get(id).await?;
        patch.apply(&mut book);
        book.validate()?;

        // The row can vanish between the read and the write.
        if !self.store.update(&book).await? {
            return Err(ServiceError::NotFound(id));
        }
        tracing::info!(id, "Book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: BookId) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound(id));
        }
        tracing::info!(id, "Book deleted");
        Ok(())
    }
}
