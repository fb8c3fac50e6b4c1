use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::db::{RentalStore, Store};
use crate::error::ApiError;
use crate::middleware::auth_context::AdminUser;
use crate::models::{
    availability::{WindowInput, WindowQuery, WindowUpdate},
    response::ApiResponse,
};
use crate::services::availability_service;

/*
    GET /api/cars/availability?carId=... (admin)
*/
pub async fn list_windows(
    store: web::Data<Store>,
    _admin: AdminUser,
    params: web::Query<WindowQuery>,
) -> Result<HttpResponse, ApiError> {
    let windows = store.list_windows(params.car_id.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(windows)))
}

/*
    POST /api/cars/availability (admin)
*/
pub async fn create_window(
    store: web::Data<Store>,
    AdminUser(admin): AdminUser,
    input: web::Json<WindowInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let car = store
        .get_car(&input.car_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car"))?;

    let window = availability_service::new_window(input, &car, Utc::now())?;
    store.insert_window(&window).await?;
    log::info!(
        "Admin '{}' added {} window {}..{} for car {}",
        admin.username,
        if window.is_available { "open" } else { "blocked" },
        window.start_date,
        window.end_date,
        window.car_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::ok(window)))
}

/*
    PATCH /api/cars/availability/{id} (admin)
*/
pub async fn update_window(
    store: web::Data<Store>,
    AdminUser(admin): AdminUser,
    path: web::Path<String>,
    input: web::Json<WindowUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let mut window = store
        .get_window(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Availability window"))?;

    let update = input.into_inner();
    let car_id = update.car_id.clone().unwrap_or_else(|| window.car_id.clone());
    let car = store
        .get_car(&car_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car"))?;

    availability_service::apply_window_update(&mut window, update, &car, Utc::now())?;
    if !store.replace_window(&window).await? {
        return Err(ApiError::not_found("Availability window"));
    }
    log::info!("Admin '{}' updated availability window {}", admin.username, id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(window)))
}

/*
    DELETE /api/cars/availability/{id} (admin)
*/
pub async fn delete_window(
    store: web::Data<Store>,
    AdminUser(admin): AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !store.delete_window(&id).await? {
        return Err(ApiError::not_found("Availability window"));
    }
    log::info!("Admin '{}' deleted availability window {}", admin.username, id);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Availability window deleted")))
}
