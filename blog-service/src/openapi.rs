/// OpenAPI documentation for the blog service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers::blogs;
use crate::models::{BlogPayload, BlogResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog Service API",
        version = "1.0.0",
        description = "JWT-protected blog CRUD. Verifies access tokens issued by the identity service with the shared secret and attributes authorship from the user_id claim.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8001", description = "Development server"),
    ),
    paths(
        blogs::welcome,
        blogs::list_blogs,
        blogs::create_blog,
        blogs::get_blog,
        blogs::update_blog,
        blogs::delete_blog,
    ),
    components(schemas(
        BlogPayload,
        BlogResponse,
    )),
    tags(
        (name = "Blogs", description = "Blog create, read, update and delete"),
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
                        .description(Some("JWT access token issued by the identity service"))
                        .build(),
                ),
            )
        }
    }
}
