//! Typed HTTP client for the books API.

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::books::{Book, BookId, BookPatch, NewBook};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl ClientError {
    /// HTTP status of a server-side rejection.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client bound to one service base URL (e.g. `http://localhost:8080/api`).
#[derive(Debug, Clone)]
pub struct BooksClient {
    client: Client,
    base_url: String,
}

impl BooksClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list(&self) -> Result<Vec<Book>, ClientError> {
        let res = self.client.get(self.url("/books")).send().await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn get(&self, id: BookId) -> Result<Book, ClientError> {
        let res = self.client.get(self.url(&format!("/books/{}", id))).send().await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn create(&self, book: &NewBook) -> Result<Book, ClientError> {
        let res = self.client.post(self.url("/books")).json(book).send().await?;
        Ok(check(res).await?.json().await?)
    }

    /// Send only the fields set in `patch`.
    pub async fn update(&self, patch: &BookPatch) -> Result<Book, ClientError> {
        let res = self.client.put(self.url("/books")).json(patch).send().await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn delete(&self, id: BookId) -> Result<(), ClientError> {
        let res = self
            .client
            .delete(self.url(&format!("/books/{}", id)))
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }
}

async fn check(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let text = res.text().await?;
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) => text,
    };
    Err(ClientError::Status { status, message })
}
