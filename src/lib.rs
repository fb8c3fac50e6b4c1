pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use actix_cors::Cors;

/// Any origin unless `CORS_ALLOWED_ORIGIN` pins one.
pub fn build_cors(allowed_origin: Option<&str>) -> Cors {
    let cors = match allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    cors.allow_any_method().allow_any_header().max_age(3600)
}
