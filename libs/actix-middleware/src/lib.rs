//! # Actix Middleware Library
//!
//! Unified middleware components for the Actix services
//!
//! ## Modules
//! - `jwt_auth`: bearer token authentication and identity claim extraction

pub mod jwt_auth;

pub use jwt_auth::{AuthError, JwtAuthMiddleware, UserId};
