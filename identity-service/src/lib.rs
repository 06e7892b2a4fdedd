//! # Identity Service Library
//!
//! User accounts and JWT issuance for the blog platform.
//!
//! ## Modules
//!
//! - `config` - Environment-based configuration
//! - `db` - Database access layer
//! - `error` - Error types and HTTP mappings
//! - `handlers` - HTTP request handlers
//! - `models` - Domain models and request/response types
//! - `openapi` - OpenAPI documentation
//! - `security` - Password hashing and verification

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod security;

pub use config::Settings;
pub use error::{IdentityError, Result};

use token_core::{TokenSigner, TokenVerifier};

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub signer: TokenSigner,
    pub verifier: TokenVerifier,
}
