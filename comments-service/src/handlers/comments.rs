//! Comment handlers
//!
//! Both handlers sit behind the remote verification middleware, so the
//! bearer token has already been accepted by the identity service when one
//! runs.

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::db;
use crate::error::CommentsError;
use crate::middleware::BearerToken;
use crate::models::{CommentResponse, CreateCommentRequest};
use crate::AppState;

/// List all comments.
#[utoipa::path(
    get,
    path = "/comments",
    tag = "Comments",
    responses(
        (status = 200, description = "Comment list", body = Vec<CommentResponse>),
        (status = 401, description = "Missing or rejected token"),
        (status = 502, description = "Identity service unreachable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_comments(state: web::Data<AppState>) -> Result<HttpResponse, CommentsError> {
    let comments = db::comments::list_comments(&state.db).await?;

    let comments: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();

    Ok(HttpResponse::Ok().json(comments))
}

/// Create a comment on an existing blog post.
///
/// The post id is checked against the blog service with the caller's own
/// token; an unknown id is a validation error, not an upstream one.
#[utoipa::path(
    post,
    path = "/comments",
    tag = "Comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Missing fields or unknown post id"),
        (status = 401, description = "Missing or rejected token"),
        (status = 502, description = "Identity or blog service unreachable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    state: web::Data<AppState>,
    token: BearerToken,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, CommentsError> {
    payload.validate()?;

    if !state.blogs.post_exists(payload.post_id, &token.0).await? {
        tracing::warn!(post_id = payload.post_id, "Rejected comment for unknown post");
        return Err(CommentsError::InvalidPostId);
    }

    let comment =
        db::comments::create_comment(&state.db, payload.post_id, &payload.title, &payload.content)
            .await?;

    tracing::info!(comment_id = comment.id, post_id = comment.post_id, "Created comment");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Comment created successfully",
        "comment": CommentResponse::from(comment),
    })))
}
