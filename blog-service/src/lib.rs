//! # Blog Service Library
//!
//! JWT-protected blog CRUD for the blog platform. Verifies access tokens
//! locally with the shared secret and stamps authorship from the identity
//! claim.
//!
//! ## Modules
//!
//! - `config` - Environment-based configuration
//! - `db` - Database access layer
//! - `error` - Error types and HTTP mappings
//! - `handlers` - HTTP request handlers
//! - `models` - Domain models and request/response types
//! - `openapi` - OpenAPI documentation

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;

pub use config::Settings;
pub use error::{BlogError, Result};

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
}
