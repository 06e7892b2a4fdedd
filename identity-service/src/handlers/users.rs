//! User registration, CRUD and greeting handlers

use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::db::{self, users::UpdateUserFields};
use crate::error::IdentityError;
use crate::models::{RegisterRequest, UpdateUserRequest, UserResponse};
use crate::security::password;
use crate::AppState;

/// Pagination query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct PaginationParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Register a new user. The only unauthenticated user endpoint.
#[utoipa::path(
    post,
    path = "/users/",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error or weak password"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register_user(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, IdentityError> {
    payload.validate()?;

    if db::users::username_exists(&state.db, &payload.username).await? {
        return Err(IdentityError::UsernameAlreadyExists);
    }

    let password_hash = password::hash_password(&payload.password)?;

    let user =
        db::users::create_user(&state.db, &payload.username, &payload.email, &password_hash)
            .await?;

    tracing::info!(user_id = user.id, "Registered new user");

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// List users with pagination.
#[utoipa::path(
    get,
    path = "/users/",
    tag = "Users",
    params(PaginationParams),
    responses(
        (status = 200, description = "User list", body = Vec<UserResponse>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, IdentityError> {
    let users = db::users::list_users(&state.db, query.limit, query.offset).await?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(HttpResponse::Ok().json(users))
}

/// Fetch a single user by ID.
#[utoipa::path(
    get,
    path = "/users/{user_id}/",
    tag = "Users",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, IdentityError> {
    match db::users::find_by_id(&state.db, path.into_inner()).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserResponse::from(user))),
        None => Err(IdentityError::UserNotFound),
    }
}

/// Partially update a user. Passwords are re-hashed before storage.
#[utoipa::path(
    put,
    path = "/users/{user_id}/",
    tag = "Users",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, IdentityError> {
    payload.validate()?;

    let user_id = path.into_inner();

    if let Some(username) = &payload.username {
        if let Some(existing) = db::users::find_by_username(&state.db, username).await? {
            if existing.id != user_id {
                return Err(IdentityError::UsernameAlreadyExists);
            }
        }
    }

    let password_hash = match &payload.password {
        Some(new_password) => Some(password::hash_password(new_password)?),
        None => None,
    };

    let fields = UpdateUserFields {
        username: payload.username.clone(),
        email: payload.email.clone(),
        password_hash,
    };

    match db::users::update_user(&state.db, user_id, fields).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserResponse::from(user))),
        None => Err(IdentityError::UserNotFound),
    }
}

/// Delete a user by ID.
#[utoipa::path(
    delete,
    path = "/users/{user_id}/",
    tag = "Users",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, IdentityError> {
    if db::users::delete_user(&state.db, path.into_inner()).await? {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "User deleted successfully!"
        })))
    } else {
        Err(IdentityError::UserNotFound)
    }
}

/// Greet the authenticated user by their stored username.
#[utoipa::path(
    get,
    path = "/hello/",
    tag = "Users",
    responses(
        (status = 200, description = "Greeting for the authenticated user"),
        (status = 400, description = "Token is valid but carries no user_id claim"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn hello_user(
    state: web::Data<AppState>,
    user_id: UserId,
) -> Result<HttpResponse, IdentityError> {
    let user = db::users::find_by_id(&state.db, user_id.0)
        .await?
        .ok_or_else(|| IdentityError::InvalidToken("user no longer exists".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Hello, {}!", user.username)
    })))
}
