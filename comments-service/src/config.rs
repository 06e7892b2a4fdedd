//! Configuration management for the comments service
//!
//! Loads settings from environment variables, with a .env file for local
//! development. This service carries no JWT secret; instead it needs the
//! identity service's verify endpoint and the blog service's base URL.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub upstream: UpstreamSettings,
    pub server: ServerSettings,
    pub cors: CorsSettings,
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

/// Upstream service endpoints. Both are required; the service cannot
/// authenticate requests or validate post ids without them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSettings {
    pub token_verify_url: String,
    pub blog_service_url: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// CORS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    pub allowed_origins: String,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file in development
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
            info!("Loaded .env file for development");
        }

        Ok(Settings {
            database: DatabaseSettings::from_env()?,
            upstream: UpstreamSettings::from_env()?,
            server: ServerSettings::from_env()?,
            cors: CorsSettings::from_env(),
        })
    }
}

impl DatabaseSettings {
    pub fn from_env() -> Result<Self> {
        Ok(DatabaseSettings {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://comments.db".to_string()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
        })
    }
}

impl UpstreamSettings {
    pub fn from_env() -> Result<Self> {
        Ok(UpstreamSettings {
            token_verify_url: env::var("TOKEN_VERIFY_URL")
                .context("TOKEN_VERIFY_URL must be set")?,
            blog_service_url: env::var("BLOG_SERVICE_URL")
                .context("BLOG_SERVICE_URL must be set")?,
        })
    }
}

impl ServerSettings {
    pub fn from_env() -> Result<Self> {
        Ok(ServerSettings {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }
}

impl CorsSettings {
    pub fn from_env() -> Self {
        CorsSettings {
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}
