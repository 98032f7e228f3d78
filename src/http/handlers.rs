//! Book endpoint handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::books::{Book, BookId, BookPatch, NewBook};
use crate::http::error::ApiError;
use crate::http::server::AppState;

fn parse_id(raw: &str) -> Result<BookId, ApiError> {
    raw.parse::<BookId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ApiError::InvalidId)
}

/// `GET /books`
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.books.list().await?))
}

/// `GET /books/{id}`
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.books.get(id).await?))
}

/// `POST /books`
pub async fn create_book(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = NewBook::from_json(&body)?;
    let created = state.books.create(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /books`
///
/// Only the keys present in the body overwrite stored values.
pub async fn update_book(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Book>, ApiError> {
    let patch = BookPatch::from_json(&body)?;
    Ok(Json(state.books.update(patch).await?))
}

/// `DELETE /books/{id}`
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
