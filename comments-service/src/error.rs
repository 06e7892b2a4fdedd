//! Error types for the comments service

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CommentsError>;

/// All errors the comments service can surface over HTTP.
#[derive(Debug, Error)]
pub enum CommentsError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid Post ID")]
    InvalidPostId,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for CommentsError {
    fn status_code(&self) -> StatusCode {
        match self {
            CommentsError::Validation(_) | CommentsError::InvalidPostId => StatusCode::BAD_REQUEST,
            CommentsError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CommentsError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            CommentsError::Database(_) | CommentsError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
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

impl From<sqlx::Error> for CommentsError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        CommentsError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CommentsError {
    fn from(err: validator::ValidationErrors) -> Self {
        CommentsError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CommentsError::InvalidPostId.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CommentsError::Unauthorized("no token".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CommentsError::UpstreamUnavailable("refused".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            CommentsError::Database("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
