//! Book entity and request payloads.
//!
//! Request bodies are matched case-insensitively on their keys, so
//! `{"Title": ..}` and `{"title": ..}` name the same field. Update payloads
//! remember which keys were present; absent keys leave stored values alone.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Storage-assigned book identifier.
pub type BookId = i32;

/// A stored book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub pages: i32,
}

/// Why a book was rejected before reaching storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidBook {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("author must not be empty")]
    EmptyAuthor,
    #[error("pages must be a positive integer")]
    NonPositivePages,
}

fn check(title: &str, author: &str, pages: i32) -> Result<(), InvalidBook> {
    if title.is_empty() {
        return Err(InvalidBook::EmptyTitle);
    }
    if author.is_empty() {
        return Err(InvalidBook::EmptyAuthor);
    }
    if pages <= 0 {
        return Err(InvalidBook::NonPositivePages);
    }
    Ok(())
}

impl Book {
    pub fn validate(&self) -> Result<(), InvalidBook> {
        check(&self.title, &self.author, self.pages)
    }
}

/// Body of a create request. A client-supplied `id` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub pages: i32,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, pages: i32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            pages,
        }
    }

    /// Decode a JSON object body.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let fields = parse_object(body)?;
        serde_json::from_value(Value::Object(fields))
    }

    pub fn validate(&self) -> Result<(), InvalidBook> {
        check(&self.title, &self.author, self.pages)
    }

    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            pages: self.pages,
        }
    }
}

/// Body of an update request. `Some` means the key was present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
}

impl BookPatch {
    /// Decode a JSON object body, keeping track of which keys were sent.
    ///
    /// An explicit `null` counts as present and clears the field to its
    /// zero value, which then fails validation for every field but `id`.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let fields = parse_object(body)?;
        Ok(Self {
            id: field(&fields, "id")?,
            title: field(&fields, "title")?,
            author: field(&fields, "author")?,
            pages: field(&fields, "pages")?,
        })
    }

    /// Overwrite the fields of `book` that this patch carries.
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(author) = &self.author {
            book.author = author.clone();
        }
        if let Some(pages) = self.pages {
            book.pages = pages;
        }
    }
}

/// Parse `body` as a JSON object with lowercased keys.
fn parse_object(body: &[u8]) -> Result<Map<String, Value>, serde_json::Error> {
    let raw: Map<String, Value> = serde_json::from_slice(body)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect())
}

fn field<T>(fields: &Map<String, Value>, key: &str) -> Result<Option<T>, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    match fields.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(T::default())),
        Some(value) => T::deserialize(value).map(Some),
    }
}
