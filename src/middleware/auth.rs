use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use serde::{Deserialize, Serialize};

use crate::services::auth_service::AuthService;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,     // subject (username)
    pub exp: usize,      // expiration time
    pub iat: usize,      // issued at
    pub user_id: String,
    pub is_admin: bool,
    pub jti: String, // token id, used for logout
}

/// Reads `Authorization: Bearer <token>` and, when the token checks out,
/// stores its `Claims` in the request extensions. Requests are never rejected
/// here; the `AuthenticatedUser`/`AdminUser` extractors and `RequireAdmin`
/// decide what needs a token.
pub struct AuthMiddleware {
    auth: AuthService,
}

impl AuthMiddleware {
    pub fn new(auth: AuthService) -> Self {
        AuthMiddleware { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            auth: self.auth.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    auth: AuthService,
}

pub fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = bearer_token(&req).and_then(|token| match self.auth.verify_token(token) {
            Ok(claims) => Some(claims),
            Err(err) => {
                log::debug!("Ignoring bearer token on {}: {}", req.path(), err);
                None
            }
        });

        if let Some(claims) = claims {
            req.extensions_mut().insert(claims);
        }

        Box::pin(self.service.call(req))
    }
}
