//! Blog domain model and API payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Blog row as stored in the database.
///
/// `author` holds the string form of the identity claim from the token that
/// created or last updated the row. It is never taken from the request body.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a blog record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlogResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Blog> for BlogResponse {
    fn from(blog: Blog) -> Self {
        BlogResponse {
            id: blog.id,
            title: blog.title,
            content: blog.content,
            author: blog.author,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

/// Create/update payload. Both fields are required and non-empty; the author
/// is deliberately absent, it always comes from the verified token.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct BlogPayload {
    #[validate(length(min = 1, max = 100, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}
