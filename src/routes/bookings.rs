use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::db::{RentalStore, Store};
use crate::error::ApiError;
use crate::middleware::auth_context::{AdminUser, AuthenticatedUser};
use crate::models::{
    bookings::{BookingFilter, BookingInput, StatusChange},
    response::ApiResponse,
};
use crate::services::booking_service;

/*
    POST /api/bookings
    Public; a valid token links the booking to the caller.
*/
pub async fn create_booking(
    store: web::Data<Store>,
    user: Option<AuthenticatedUser>,
    input: web::Json<BookingInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    booking_service::validate_booking(&input)?;

    if let Some(car_id) = input.car_id.as_deref().filter(|id| !id.trim().is_empty()) {
        if store.get_car(car_id.trim()).await?.is_none() {
            return Err(ApiError::not_found("Car"));
        }
    }

    let booking = booking_service::new_booking(input, user.map(|user| user.user_id), Utc::now());
    store.insert_booking(&booking).await?;
    log::info!(
        "Booking {} created for {} from {} to {}",
        booking.id,
        booking.car_type,
        booking.pickup_date,
        booking.return_date
    );
    Ok(HttpResponse::Created().json(ApiResponse::ok(booking)))
}

/*
    GET /api/bookings?status=pending&from=2024-06-01&to=2024-06-30 (admin)
*/
pub async fn list_bookings(
    store: web::Data<Store>,
    _admin: AdminUser,
    params: web::Query<BookingFilter>,
) -> Result<HttpResponse, ApiError> {
    let filter = params.into_inner();
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if to < from {
            return Err(ApiError::validation("to must not be before from"));
        }
    }

    let mut bookings = store.list_bookings(&filter).await?;
    booking_service::sort_newest_first(&mut bookings);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(bookings)))
}

/*
    GET /api/bookings/{id} (admin)
*/
pub async fn get_booking(
    store: web::Data<Store>,
    _admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match store.get_booking(&id).await? {
        Some(booking) => Ok(HttpResponse::Ok().json(ApiResponse::ok(booking))),
        None => Err(ApiError::not_found("Booking")),
    }
}

/*
    PATCH /api/bookings/{id} (admin)
    Body: { "status": "accepted" | "rejected", "rejectionReason"?: "..." }
*/
pub async fn update_booking_status(
    store: web::Data<Store>,
    AdminUser(admin): AdminUser,
    path: web::Path<String>,
    input: web::Json<StatusChange>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let update = booking_service::status_update(input.into_inner(), Utc::now())?;

    match store.transition_booking(&id, &update).await? {
        Some(booking) => {
            log::info!(
                "Admin '{}' marked booking {} as {}",
                admin.username,
                id,
                booking.status.as_str()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::ok(booking)))
        }
        // Nothing pending under that id: tell a missing booking from a settled one.
        None => match store.get_booking(&id).await? {
            Some(existing) => Err(booking_service::transition_conflict(existing.status)),
            None => Err(ApiError::not_found("Booking")),
        },
    }
}
