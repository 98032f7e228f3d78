//! In-memory book store.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::books::model::{Book, BookId, NewBook};
use crate::store::{BookStore, StoreError};

/// Process-local store keyed by id.
pub struct MemoryStore {
    books: DashMap<BookId, Book>,
    next_id: AtomicI32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let mut books: Vec<Book> = self.books.iter().map(|entry| entry.value().clone()).collect();
        books.sort_by_key(|b| b.id);
        Ok(books)
    }

    async fn get(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        Ok(self.books.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if id <= 0 {
            return Err(StoreError::Unavailable("id sequence exhausted".into()));
        }
        let book = book.into_book(id);
        self.books.insert(id, book.clone());
        Ok(book)
    }

    async fn update(&self, book: &Book) -> Result<bool, StoreError> {
        match self.books.get_mut(&book.id) {
            Some(mut slot) => {
                *slot = book.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: BookId) -> Result<bool, StoreError> {
        Ok(self.books.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
