use actix_web::{http::header, web, HttpResponse};
use chrono::Utc;

use crate::config::CachePolicy;
use crate::db::{RentalStore, Store};
use crate::error::ApiError;
use crate::middleware::auth_context::AdminUser;
use crate::models::{
    availability::AvailabilityQuery,
    car::{CarInput, CarQuery, CarUpdate},
    response::ApiResponse,
};
use crate::services::{
    availability_service::{self, AvailabilityFilters, DateRange},
    catalogue_service,
    validation::normalize_optional,
};

/*
    GET /api/cars?type=suv
*/
pub async fn list_cars(
    store: web::Data<Store>,
    cache: web::Data<CachePolicy>,
    params: web::Query<CarQuery>,
) -> Result<HttpResponse, ApiError> {
    let car_type = normalize_optional(params.into_inner().car_type);
    let cars: Vec<_> = store
        .list_cars()
        .await?
        .into_iter()
        .filter(|car| {
            car_type
                .as_deref()
                .map_or(true, |car_type| car.car_type.eq_ignore_ascii_case(car_type))
        })
        .collect();

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, cache.header_value()))
        .json(ApiResponse::ok(cars)))
}

/*
    GET /api/cars/available?startDate=2024-06-12&endDate=2024-06-20&type=suv&city=Paris
*/
pub async fn available_cars(
    store: web::Data<Store>,
    params: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse, ApiError> {
    let params = params.into_inner();
    let range = DateRange::new(params.start_date, params.end_date)?;
    let filters = AvailabilityFilters::new(params.car_type, params.city);

    let cars = availability_service::available_cars(&store, &range, &filters).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(ApiResponse::ok(cars)))
}

/*
    GET /api/cars/{id}
*/
pub async fn get_car(
    store: web::Data<Store>,
    cache: web::Data<CachePolicy>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match store.get_car(&id).await? {
        Some(car) => Ok(HttpResponse::Ok()
            .insert_header((header::CACHE_CONTROL, cache.header_value()))
            .json(ApiResponse::ok(car))),
        None => Err(ApiError::not_found("Car")),
    }
}

/*
    POST /api/cars (admin)
*/
pub async fn create_car(
    store: web::Data<Store>,
    AdminUser(admin): AdminUser,
    input: web::Json<CarInput>,
) -> Result<HttpResponse, ApiError> {
    let car = catalogue_service::new_car(input.into_inner(), Utc::now())?;
    store.insert_car(&car).await?;
    log::info!("Admin '{}' created car {} ({})", admin.username, car.id, car.name);
    Ok(HttpResponse::Created().json(ApiResponse::ok(car)))
}

/*
    PATCH /api/cars/{id} (admin)
*/
pub async fn update_car(
    store: web::Data<Store>,
    AdminUser(admin): AdminUser,
    path: web::Path<String>,
    input: web::Json<CarUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let car = store
        .get_car(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car"))?;

    let edited = catalogue_service::apply_car_update(&car, input.into_inner(), Utc::now())?;
    if !store.replace_car(&edited).await? {
        return Err(ApiError::not_found("Car"));
    }
    log::info!("Admin '{}' updated car {}", admin.username, id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(edited)))
}

/*
    DELETE /api/cars/{id} (admin)
*/
pub async fn delete_car(
    store: web::Data<Store>,
    AdminUser(admin): AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !store.delete_car(&id).await? {
        return Err(ApiError::not_found("Car"));
    }
    log::info!("Admin '{}' deleted car {}", admin.username, id);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Car deleted")))
}
