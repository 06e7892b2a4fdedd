/// OpenAPI documentation for the comments service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers::comments;
use crate::models::{CommentResponse, CreateCommentRequest};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Comments Service API",
        version = "1.0.0",
        description = "Comments on blog posts. Holds no JWT secret: bearer tokens are verified remotely against the identity service and post ids against the blog service.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    paths(
        comments::list_comments,
        comments::create_comment,
    ),
    components(schemas(
        CreateCommentRequest,
        CommentResponse,
    )),
    tags(
        (name = "Comments", description = "Comment listing and creation"),
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
                        .description(Some("JWT access token, verified remotely by the identity service"))
                        .build(),
                ),
            )
        }
    }
}
