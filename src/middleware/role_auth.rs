use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::error::ApiError;
use crate::middleware::auth::Claims;

/// Guards a whole scope: 401 without valid claims, 403 for non-admins.
/// Must sit inside `AuthMiddleware` so the claims are already decoded.
pub struct RequireAdmin;

impl<S, B> Transform<S, ServiceRequest> for RequireAdmin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireAdminService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAdminService { service }))
    }
}

pub struct RequireAdminService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireAdminService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();

        let denied = match claims {
            Some(claims) if claims.is_admin => None,
            Some(claims) => {
                log::warn!("User '{}' denied admin access to {}", claims.sub, req.path());
                Some(ApiError::Authorization("Admin privileges required".to_string()))
            }
            None => Some(ApiError::Authentication("Authentication required".to_string())),
        };

        if let Some(err) = denied {
            let response = req.into_response(err.error_response()).map_into_right_body();
            return Box::pin(ready(Ok(response)));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
