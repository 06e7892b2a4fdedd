//! Blog database operations

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Blog;

/// List all blogs ordered by ID
pub async fn list_blogs(pool: &SqlitePool) -> Result<Vec<Blog>> {
    let blogs = sqlx::query_as::<_, Blog>("SELECT * FROM blogs ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(blogs)
}

/// Find a blog by ID
pub async fn find_by_id(pool: &SqlitePool, blog_id: i64) -> Result<Option<Blog>> {
    let blog = sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = ?")
        .bind(blog_id)
        .fetch_optional(pool)
        .await?;

    Ok(blog)
}

/// Insert a new blog and return the stored row
pub async fn create_blog(
    pool: &SqlitePool,
    title: &str,
    content: &str,
    author: &str,
) -> Result<Blog> {
    let now = Utc::now();

    let blog = sqlx::query_as::<_, Blog>(
        r#"
        INSERT INTO blogs (title, content, author, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(author)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(blog)
}

/// Replace title, content and author. Returns `None` when the blog does not
/// exist. The author is re-stamped from the current caller's claim.
pub async fn update_blog(
    pool: &SqlitePool,
    blog_id: i64,
    title: &str,
    content: &str,
    author: &str,
) -> Result<Option<Blog>> {
    let now = Utc::now();

    let blog = sqlx::query_as::<_, Blog>(
        r#"
        UPDATE blogs
        SET title = ?, content = ?, author = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(author)
    .bind(now)
    .bind(blog_id)
    .fetch_optional(pool)
    .await?;

    Ok(blog)
}

/// Delete a blog. Returns `false` when no row matched.
pub async fn delete_blog(pool: &SqlitePool, blog_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
        .bind(blog_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
