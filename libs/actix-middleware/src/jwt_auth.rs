use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpMessage, HttpResponse, ResponseError,
};
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use token_core::TokenVerifier;

/// User ID extracted from the JWT identity claim
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub i64);

/// Authentication failures raised before a handler runs.
///
/// A missing or unverifiable token is a 401. A token that verifies but
/// carries no identity claim is a 400, so clients can tell a bad credential
/// apart from a well-signed token minted without `user_id`.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("Invalid token: Missing user_id")]
    MissingIdentityClaim,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::MissingIdentityClaim => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
            "status": self.status_code().as_u16(),
        }))
    }
}

/// JWT Authentication Middleware
///
/// Holds the verifier it authenticates with; construct one per protected
/// scope from application state.
pub struct JwtAuthMiddleware {
    verifier: TokenVerifier,
}

impl JwtAuthMiddleware {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    verifier: TokenVerifier,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let verifier = self.verifier.clone();

        Box::pin(async move {
            // Extract Authorization header
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| {
                    AuthError::Unauthorized("Missing Authorization header".to_string())
                })?;

            // Extract token
            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                AuthError::Unauthorized("Invalid Authorization header format".to_string())
            })?;

            // Verify signature and expiry
            let claims = verifier.verify(token).map_err(|e| {
                tracing::warn!("JWT validation failed: {}", e);
                AuthError::Unauthorized(format!("Invalid token: {}", e))
            })?;

            // Require the identity claim
            let user_id = claims.user_id.ok_or(AuthError::MissingIdentityClaim)?;

            // Insert UserId into request extensions
            req.extensions_mut().insert(UserId(user_id));

            service.call(req).await
        })
    }
}

/// FromRequest implementation for UserId
impl actix_web::FromRequest for UserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(
                AuthError::Unauthorized("User not authenticated".to_string()).into(),
            )),
        }
    }
}
