//! Comment database operations

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Comment;

/// List all comments ordered by ID
pub async fn list_comments(pool: &SqlitePool) -> Result<Vec<Comment>> {
    let comments = sqlx::query_as::<_, Comment>("SELECT * FROM comments ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(comments)
}

/// Insert a new comment and return the stored row
pub async fn create_comment(
    pool: &SqlitePool,
    post_id: i64,
    title: &str,
    content: &str,
) -> Result<Comment> {
    let now = Utc::now();

    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, title, content, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(post_id)
    .bind(title)
    .bind(content)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}
