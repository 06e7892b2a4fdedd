//! Blog CRUD handlers
//!
//! Every handler here sits behind the JWT gate, so by the time one runs the
//! token has verified and the `user_id` claim is present. Authorship is
//! stamped from that claim; the request body never carries an author.

use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::db;
use crate::error::BlogError;
use crate::models::{BlogPayload, BlogResponse};
use crate::AppState;

/// Unauthenticated welcome message.
#[utoipa::path(
    get,
    path = "/",
    tag = "Blogs",
    responses(
        (status = 200, description = "Welcome message")
    )
)]
pub async fn welcome() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Blog Microservice!"
    }))
}

/// List all blogs.
#[utoipa::path(
    get,
    path = "/blogs",
    tag = "Blogs",
    responses(
        (status = 200, description = "Blog list", body = Vec<BlogResponse>),
        (status = 400, description = "Token is valid but carries no user_id claim"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_blogs(state: web::Data<AppState>) -> Result<HttpResponse, BlogError> {
    let blogs = db::blogs::list_blogs(&state.db).await?;

    let blogs: Vec<BlogResponse> = blogs.into_iter().map(BlogResponse::from).collect();

    Ok(HttpResponse::Ok().json(blogs))
}

/// Create a blog authored by the caller.
#[utoipa::path(
    post,
    path = "/blogs",
    tag = "Blogs",
    request_body = BlogPayload,
    responses(
        (status = 201, description = "Blog created", body = BlogResponse),
        (status = 400, description = "Validation error or missing user_id claim"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_blog(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: web::Json<BlogPayload>,
) -> Result<HttpResponse, BlogError> {
    payload.validate()?;

    let author = user_id.0.to_string();
    let blog = db::blogs::create_blog(&state.db, &payload.title, &payload.content, &author).await?;

    tracing::info!(blog_id = blog.id, author = %blog.author, "Created blog");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Blog created successfully!",
        "blog": BlogResponse::from(blog),
    })))
}

/// Fetch a single blog by ID.
#[utoipa::path(
    get,
    path = "/blogs/{blog_id}",
    tag = "Blogs",
    params(("blog_id" = i64, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Blog found", body = BlogResponse),
        (status = 400, description = "Token is valid but carries no user_id claim"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Blog not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_blog(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, BlogError> {
    match db::blogs::find_by_id(&state.db, path.into_inner()).await? {
        Some(blog) => Ok(HttpResponse::Ok().json(BlogResponse::from(blog))),
        None => Err(BlogError::BlogNotFound),
    }
}

/// Replace a blog's title and content, re-stamping the author from the
/// current caller's claim.
#[utoipa::path(
    put,
    path = "/blogs/{blog_id}",
    tag = "Blogs",
    params(("blog_id" = i64, Path, description = "Blog ID")),
    request_body = BlogPayload,
    responses(
        (status = 200, description = "Blog updated", body = BlogResponse),
        (status = 400, description = "Validation error or missing user_id claim"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Blog not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_blog(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    user_id: UserId,
    payload: web::Json<BlogPayload>,
) -> Result<HttpResponse, BlogError> {
    payload.validate()?;

    let author = user_id.0.to_string();

    match db::blogs::update_blog(
        &state.db,
        path.into_inner(),
        &payload.title,
        &payload.content,
        &author,
    )
    .await?
    {
        Some(blog) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Blog updated successfully!",
            "blog": BlogResponse::from(blog),
        }))),
        None => Err(BlogError::BlogNotFound),
    }
}

/// Delete a blog by ID.
#[utoipa::path(
    delete,
    path = "/blogs/{blog_id}",
    tag = "Blogs",
    params(("blog_id" = i64, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Blog deleted"),
        (status = 400, description = "Token is valid but carries no user_id claim"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Blog not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_blog(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, BlogError> {
    if db::blogs::delete_blog(&state.db, path.into_inner()).await? {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Blog deleted successfully!"
        })))
    } else {
        Err(BlogError::BlogNotFound)
    }
}
