use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::db::{RentalStore, Store};
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::{
    response::ApiResponse,
    user::{LoginRequest, RegisterRequest, UserProfile},
};
use crate::services::auth_service::AuthService;

fn invalid_credentials() -> ApiError {
    ApiError::Authentication("Invalid credentials".to_string())
}

/*
    POST /api/auth/login
*/
pub async fn login(
    store: web::Data<Store>,
    auth: web::Data<AuthService>,
    input: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let username = input.username.trim();

    let user = match store.find_user_by_username(username).await? {
        Some(user) => user,
        None => {
            log::info!("Login attempt for unknown user '{}'", username);
            return Err(invalid_credentials());
        }
    };

    if !auth.verify_password(&input.password, &user.password_hash) {
        store.record_login(&user.id, false, Utc::now()).await?;
        log::warn!(
            "Failed login for '{}' ({} previous failures)",
            username,
            user.failed_logins
        );
        return Err(invalid_credentials());
    }

    store.record_login(&user.id, true, Utc::now()).await?;
    let token = auth.issue_token(&user)?;
    log::info!("User '{}' logged in", user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::with_token(UserProfile::from(&user), token)))
}

/*
    POST /api/auth/register
*/
pub async fn register(
    store: web::Data<Store>,
    auth: web::Data<AuthService>,
    input: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();

    // Self-service accounts are never admins.
    let user = auth.new_user(
        &input.username,
        &input.password,
        input.full_name,
        input.email,
        false,
    )?;
    store.insert_user(&user).await?;
    let token = auth.issue_token(&user)?;
    log::info!("Registered user '{}'", user.username);

    Ok(HttpResponse::Created().json(ApiResponse::with_token(UserProfile::from(&user), token)))
}

/*
    GET /api/auth/me
*/
pub async fn me(
    store: web::Data<Store>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    match store.get_user(&user.user_id).await? {
        Some(stored) => Ok(HttpResponse::Ok().json(ApiResponse::ok(UserProfile::from(&stored)))),
        None => Err(ApiError::Authentication(
            "User no longer exists".to_string(),
        )),
    }
}

/*
    POST /api/auth/logout
*/
pub async fn logout(
    auth: web::Data<AuthService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    auth.revoke(&user.claims);
    log::info!("User '{}' logged out", user.username);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Logged out")))
}
