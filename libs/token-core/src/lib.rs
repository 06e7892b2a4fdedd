//! # Token Core Library
//!
//! Shared JWT claim convention for all services
//!
//! ## Modules
//! - `jwt`: claim shape, HS256 signing and verification, token pairs

pub mod jwt;

pub use jwt::{Claims, TokenError, TokenPair, TokenSigner, TokenVerifier};
pub use jwt::{DEFAULT_ACCESS_TOKEN_EXPIRY_SECS, DEFAULT_REFRESH_TOKEN_EXPIRY_SECS};
