use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};

use crate::error::ApiError;
use crate::middleware::auth::Claims;

/// Caller identified by a valid bearer token. Fails with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub is_admin: bool,
    pub claims: Claims,
}

impl AuthenticatedUser {
    fn from_claims(req: &HttpRequest) -> Result<Self, ApiError> {
        match req.extensions().get::<Claims>() {
            Some(claims) => Ok(AuthenticatedUser {
                user_id: claims.user_id.clone(),
                username: claims.sub.clone(),
                is_admin: claims.is_admin,
                claims: claims.clone(),
            }),
            None => Err(ApiError::Authentication(
                "Authentication required".to_string(),
            )),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_claims(req))
    }
}

/// Authenticated caller with the admin flag: 401 without a token, 403 for
/// regular users.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = AuthenticatedUser::from_claims(req).and_then(|user| {
            if user.is_admin {
                Ok(AdminUser(user))
            } else {
                log::warn!("User '{}' denied admin access to {}", user.username, req.path());
                Err(ApiError::Authorization(
                    "Admin privileges required".to_string(),
                ))
            }
        });
        ready(result)
    }
}
