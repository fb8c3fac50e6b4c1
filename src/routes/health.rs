use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::env;

use crate::db::{RentalStore, Store};
use crate::models::response::ApiResponse;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    storage: ServiceStatus,
    environment: String,
    version: String,
}

#[derive(Serialize)]
struct ServiceStatus {
    backend: String,
    status: String,
    details: Option<String>,
}

/*
    GET /health
*/
pub async fn health_check(store: web::Data<Store>) -> impl Responder {
    let storage = match store.ping().await {
        Ok(()) => ServiceStatus {
            backend: store.backend_name().to_string(),
            status: "ok".to_string(),
            details: None,
        },
        Err(err) => {
            log::error!("Storage health check failed: {}", err);
            ServiceStatus {
                backend: store.backend_name().to_string(),
                status: "error".to_string(),
                details: Some("Storage is unreachable".to_string()),
            }
        }
    };

    let health = HealthStatus {
        status: if storage.status == "ok" { "ok" } else { "degraded" }.to_string(),
        storage,
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if health.status == "ok" {
        HttpResponse::Ok().json(ApiResponse::ok(health))
    } else {
        HttpResponse::ServiceUnavailable().json(ApiResponse::ok(health))
    }
}
