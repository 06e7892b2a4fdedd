/// OpenAPI documentation for the identity service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers::{tokens, users};
use crate::models::{
    RefreshTokenRequest, RegisterRequest, TokenRequest, UpdateUserRequest, UserResponse,
    VerifyTokenRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Identity Service API",
        version = "1.0.0",
        description = "User accounts and JWT issuance for the blog platform. Registers users, verifies credentials, and issues the access/refresh token pairs the other services trust.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Development server"),
    ),
    paths(
        tokens::issue_token_pair,
        tokens::refresh_token,
        tokens::verify_token,
        users::register_user,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::hello_user,
    ),
    components(schemas(
        TokenRequest,
        RefreshTokenRequest,
        VerifyTokenRequest,
        RegisterRequest,
        UpdateUserRequest,
        UserResponse,
        tokens::TokenPairResponse,
        tokens::AccessTokenResponse,
    )),
    tags(
        (name = "Tokens", description = "Token issuance, refresh and verification"),
        (name = "Users", description = "User registration and management"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT access token issued by this service"))
                        .build(),
                ),
            )
        }
    }
}
