use actix_web::{http::header, web, HttpResponse};
use chrono::Utc;

use crate::config::CachePolicy;
use crate::db::{RentalStore, Store};
use crate::error::ApiError;
use crate::middleware::auth_context::AdminUser;
use crate::models::{response::ApiResponse, settings::SettingsUpdate};
use crate::services::settings_service;

/*
    GET /api/settings
*/
pub async fn get_settings(
    store: web::Data<Store>,
    cache: web::Data<CachePolicy>,
) -> Result<HttpResponse, ApiError> {
    let settings = settings_service::current_settings(&store).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, cache.header_value()))
        .json(ApiResponse::ok(settings)))
}

/*
    PUT /api/settings (admin)
    Fields left out keep their current value.
*/
pub async fn update_settings(
    store: web::Data<Store>,
    AdminUser(admin): AdminUser,
    input: web::Json<SettingsUpdate>,
) -> Result<HttpResponse, ApiError> {
    let current = settings_service::current_settings(&store).await?;
    let settings = settings_service::apply_settings_update(current, input.into_inner(), Utc::now())?;
    store.save_settings(&settings).await?;
    log::info!("Admin '{}' updated site settings", admin.username);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(settings)))
}
