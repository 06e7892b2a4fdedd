//! Token issuance, refresh and verification handlers

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::db;
use crate::error::IdentityError;
use crate::models::{RefreshTokenRequest, TokenRequest, VerifyTokenRequest};
use crate::security::password;
use crate::AppState;

/// Access and refresh token pair returned on login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Fresh access token returned by the refresh endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// Issue an access/refresh token pair for valid credentials.
#[utoipa::path(
    post,
    path = "/token/",
    tag = "Tokens",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn issue_token_pair(
    state: web::Data<AppState>,
    payload: web::Json<TokenRequest>,
) -> Result<HttpResponse, IdentityError> {
    payload.validate()?;

    let user = db::users::find_by_username(&state.db, &payload.username)
        .await?
        .ok_or(IdentityError::InvalidCredentials)?;

    password::verify_password(&payload.password, &user.password_hash)?;

    let pair = state.signer.issue_pair(user.id, &user.username)?;

    tracing::info!(user_id = user.id, "Issued token pair");

    Ok(HttpResponse::Ok().json(TokenPairResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: pair.token_type,
        expires_in: pair.expires_in,
    }))
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/token/refresh/",
    tag = "Tokens",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token issued", body = AccessTokenResponse),
        (status = 400, description = "Token is valid but carries no user_id claim"),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh_token(
    state: web::Data<AppState>,
    payload: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, IdentityError> {
    let claims = state.verifier.verify(&payload.refresh_token)?;

    if claims.token_type != "refresh" {
        return Err(IdentityError::InvalidToken(
            "not a refresh token".to_string(),
        ));
    }

    let user_id = claims.user_id.ok_or(IdentityError::MissingIdentityClaim)?;

    let access_token = state.signer.issue_access_token(user_id, &claims.sub)?;

    Ok(HttpResponse::Ok().json(AccessTokenResponse { access_token }))
}

/// Check whether a token is valid. Returns an empty object on success.
#[utoipa::path(
    post,
    path = "/token/verify/",
    tag = "Tokens",
    request_body = VerifyTokenRequest,
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub async fn verify_token(
    state: web::Data<AppState>,
    payload: web::Json<VerifyTokenRequest>,
) -> Result<HttpResponse, IdentityError> {
    state.verifier.verify(&payload.token)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}
