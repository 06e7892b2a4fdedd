//! Remote token verification
//!
//! This service holds no JWT secret. The middleware forwards the bearer
//! token to the identity service's verify endpoint and only lets the request
//! through on a 200. The raw token is kept in request extensions so handlers
//! can forward it to the blog service.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::clients::IdentityClient;
use crate::error::CommentsError;

/// Raw bearer token of the authenticated request.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Middleware verifying bearer tokens against the identity service.
pub struct RemoteJwtMiddleware {
    identity: IdentityClient,
}

impl RemoteJwtMiddleware {
    pub fn new(identity: IdentityClient) -> Self {
        Self { identity }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RemoteJwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RemoteJwtMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RemoteJwtMiddlewareService {
            service: Rc::new(service),
            identity: self.identity.clone(),
        }))
    }
}

pub struct RemoteJwtMiddlewareService<S> {
    service: Rc<S>,
    identity: IdentityClient,
}

impl<S, B> Service<ServiceRequest> for RemoteJwtMiddlewareService<S>
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
        let identity = self.identity.clone();

        Box::pin(async move {
            // Extract Authorization header
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| {
                    CommentsError::Unauthorized("Missing token".to_string())
                })?;

            // Extract token
            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                CommentsError::Unauthorized("Missing token".to_string())
            })?;

            // Delegate signature and expiry checking to the identity service
            identity.verify_token(token).await.map_err(|e| {
                tracing::warn!("Remote token verification failed: {}", e);
                e
            })?;

            // Keep the raw token so handlers can forward it upstream
            req.extensions_mut()
                .insert(BearerToken(token.to_string()));

            service.call(req).await
        })
    }
}

/// FromRequest implementation for BearerToken
impl actix_web::FromRequest for BearerToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<BearerToken>() {
            Some(token) => ready(Ok(token.clone())),
            None => ready(Err(
                CommentsError::Unauthorized("Missing token".to_string()).into(),
            )),
        }
    }
}
