//! Typed HTTP clients for the upstream services
//!
//! The comments service trusts the identity service with signature checking
//! and the blog service with post existence, so both dependencies are plain
//! HTTP calls carrying the caller's own bearer token where one is needed.

use serde::Deserialize;

use crate::error::{CommentsError, Result};

/// Client for the identity service's token verification endpoint.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    verify_url: String,
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, verify_url: String) -> Self {
        Self { http, verify_url }
    }

    /// Ask the identity service whether a token is valid.
    ///
    /// A non-200 answer means the token was rejected. A transport failure is
    /// surfaced separately so it maps to 502 rather than 401.
    pub async fn verify_token(&self, token: &str) -> Result<()> {
        let response = self
            .http
            .post(&self.verify_url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Token verification request failed: {}", e);
                CommentsError::UpstreamUnavailable(format!("identity service: {}", e))
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CommentsError::Unauthorized("Invalid token".to_string()))
        }
    }
}

/// Blog record projection, only the id matters here.
#[derive(Debug, Deserialize)]
struct BlogRecord {
    id: i64,
}

/// Client for the blog service's listing endpoint.
#[derive(Clone)]
pub struct BlogClient {
    http: reqwest::Client,
    base_url: String,
}

impl BlogClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check whether a post id exists, using the caller's bearer token.
    pub async fn post_exists(&self, post_id: i64, bearer_token: &str) -> Result<bool> {
        let url = format!("{}/blogs", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(bearer_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Blog listing request failed: {}", e);
                CommentsError::UpstreamUnavailable(format!("blog service: {}", e))
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Blog service rejected the listing request");
            return Err(CommentsError::UpstreamUnavailable(format!(
                "blog service answered {}",
                response.status()
            )));
        }

        let blogs: Vec<BlogRecord> = response.json().await.map_err(|e| {
            tracing::error!("Blog listing response unreadable: {}", e);
            CommentsError::UpstreamUnavailable(format!("blog service: {}", e))
        })?;

        Ok(blogs.iter().any(|blog| blog.id == post_id))
    }
}
