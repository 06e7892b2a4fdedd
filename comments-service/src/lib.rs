//! # Comments Service Library
//!
//! Comments attached to blog posts. Holds no JWT secret: bearer tokens are
//! verified remotely against the identity service, and post ids are checked
//! against the blog service with the caller's own token.
//!
//! ## Modules
//!
//! - `clients` - Typed HTTP clients for the upstream services
//! - `config` - Environment-based configuration
//! - `db` - Database access layer
//! - `error` - Error types and HTTP mappings
//! - `handlers` - HTTP request handlers
//! - `middleware` - Remote token verification
//! - `models` - Domain models and request/response types
//! - `openapi` - OpenAPI documentation

pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;

pub use config::Settings;
pub use error::{CommentsError, Result};

use clients::BlogClient;

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub blogs: BlogClient,
}
