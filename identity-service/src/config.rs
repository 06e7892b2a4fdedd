//! Configuration management for the identity service
//!
//! Loads settings from environment variables, with a .env file for local
//! development.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use token_core::{DEFAULT_ACCESS_TOKEN_EXPIRY_SECS, DEFAULT_REFRESH_TOKEN_EXPIRY_SECS};
use tracing::info;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub server: ServerSettings,
    pub cors: CorsSettings,
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

/// JWT signing settings shared with the other services via JWT_SECRET_KEY
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    pub secret_key: String,
    pub access_token_expiry_secs: i64,
    pub refresh_token_expiry_secs: i64,
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
            jwt: JwtSettings::from_env()?,
            server: ServerSettings::from_env()?,
            cors: CorsSettings::from_env(),
        })
    }
}

impl DatabaseSettings {
    pub fn from_env() -> Result<Self> {
        Ok(DatabaseSettings {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://identity.db".to_string()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
        })
    }
}

impl JwtSettings {
    pub fn from_env() -> Result<Self> {
        Ok(JwtSettings {
            secret_key: env::var("JWT_SECRET_KEY").context("JWT_SECRET_KEY must be set")?,
            access_token_expiry_secs: env::var("JWT_ACCESS_TOKEN_EXPIRY_SECS")
                .unwrap_or_else(|_| DEFAULT_ACCESS_TOKEN_EXPIRY_SECS.to_string())
                .parse()
                .context("JWT_ACCESS_TOKEN_EXPIRY_SECS must be a number")?,
            refresh_token_expiry_secs: env::var("JWT_REFRESH_TOKEN_EXPIRY_SECS")
                .unwrap_or_else(|_| DEFAULT_REFRESH_TOKEN_EXPIRY_SECS.to_string())
                .parse()
                .context("JWT_REFRESH_TOKEN_EXPIRY_SECS must be a number")?,
        })
    }
}

impl ServerSettings {
    pub fn from_env() -> Result<Self> {
        Ok(ServerSettings {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
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
