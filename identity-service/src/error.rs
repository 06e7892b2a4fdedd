//! Error types for the identity service

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;
use token_core::TokenError;

pub type Result<T> = std::result::Result<T, IdentityError>;

/// All errors the identity service can surface over HTTP.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid token: Missing user_id")]
    MissingIdentityClaim,

    #[error("User not found")]
    UserNotFound,

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for IdentityError {
    fn status_code(&self) -> StatusCode {
        match self {
            IdentityError::InvalidCredentials | IdentityError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            IdentityError::MissingIdentityClaim
            | IdentityError::WeakPassword(_)
            | IdentityError::Validation(_) => StatusCode::BAD_REQUEST,
            IdentityError::UserNotFound => StatusCode::NOT_FOUND,
            IdentityError::UsernameAlreadyExists => StatusCode::CONFLICT,
            IdentityError::Database(_) | IdentityError::Internal(_) => {
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

impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        IdentityError::Database(err.to_string())
    }
}

impl From<TokenError> for IdentityError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid(_) => {
                IdentityError::InvalidToken(err.to_string())
            }
            TokenError::Signing(msg) => {
                tracing::error!("Token signing failed: {}", msg);
                IdentityError::Internal(msg)
            }
        }
    }
}

impl From<validator::ValidationErrors> for IdentityError {
    fn from(err: validator::ValidationErrors) -> Self {
        IdentityError::Validation(err.to_string())
    }
}
