use actix_web::{web, HttpResponse};

use crate::db::{RentalStore, Store};
use crate::error::ApiError;
use crate::middleware::role_auth::RequireAdmin;
use crate::models::{
    bookings::{BookingFilter, BookingStatus},
    customer::{BookingCounts, DashboardStats},
    response::ApiResponse,
};
use crate::services::customer_service;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(RequireAdmin)
            .route("/customers", web::get().to(list_customers))
            .route("/stats", web::get().to(dashboard_stats)),
    );
}

/*
    GET /api/admin/customers
    Recomputed from accepted bookings on every call.
*/
pub async fn list_customers(store: web::Data<Store>) -> Result<HttpResponse, ApiError> {
    let bookings = store
        .list_bookings(&BookingFilter::with_status(BookingStatus::Accepted))
        .await?;
    let customers = customer_service::derive_customers(&bookings);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(customers)))
}

/*
    GET /api/admin/stats
*/
pub async fn dashboard_stats(store: web::Data<Store>) -> Result<HttpResponse, ApiError> {
    let cars = store.list_cars().await?.len();
    let bookings = store.list_bookings(&BookingFilter::default()).await?;

    let count = |status: BookingStatus| bookings.iter().filter(|b| b.status == status).count();
    let stats = DashboardStats {
        cars,
        bookings: BookingCounts {
            total: bookings.len(),
            pending: count(BookingStatus::Pending),
            accepted: count(BookingStatus::Accepted),
            rejected: count(BookingStatus::Rejected),
        },
        customers: customer_service::derive_customers(&bookings).len(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}
