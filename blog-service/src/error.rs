//! Error types for the blog service

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlogError>;

/// All errors the blog service can surface over HTTP.
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Blog not found")]
    BlogNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for BlogError {
    fn status_code(&self) -> StatusCode {
        match self {
            BlogError::BlogNotFound => StatusCode::NOT_FOUND,
            BlogError::Validation(_) => StatusCode::BAD_REQUEST,
            BlogError::Database(_) | BlogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for BlogError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        BlogError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for BlogError {
    fn from(err: validator::ValidationErrors) -> Self {
        BlogError::Validation(err.to_string())
    }
}
