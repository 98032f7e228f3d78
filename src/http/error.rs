//! Mapping of failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::books::{InvalidBook, ServiceError};

/// Client-facing error. The `Display` text is the response message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("The provided id is invalid. Please ensure it is a positive integer.")]
    InvalidId,

    #[error("The id was not provided.")]
    MissingId,

    #[error("The requested book id could not be found.")]
    NotFound,

    #[error("Invalid input: {0}")]
    Invalid(InvalidBook),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_)
            | ApiError::InvalidId
            | ApiError::MissingId
            | ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::InvalidBody(e.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => ApiError::NotFound,
            ServiceError::MissingId => ApiError::MissingId,
            ServiceError::Invalid(reason) => ApiError::Invalid(reason),
            ServiceError::Store(e) => {
                tracing::error!(error = %e, "Storage failure");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
