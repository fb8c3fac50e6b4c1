pub mod admin;
pub mod auth;
pub mod availability;
pub mod bookings;
pub mod cars;
pub mod health;
pub mod settings;

use actix_web::web;

use crate::config::CachePolicy;
use crate::error::{json_error_handler, path_error_handler, query_error_handler};

/// Registers every route plus the extractor configs that turn malformed
/// input into 400 envelopes.
pub fn configure(cfg: &mut web::ServiceConfig, cache: CachePolicy) {
    cfg.app_data(web::Data::new(cache))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(auth::login))
                        .route("/register", web::post().to(auth::register))
                        .route("/me", web::get().to(auth::me))
                        .route("/logout", web::post().to(auth::logout)),
                )
                .service(
                    web::scope("/cars")
                        .route("", web::get().to(cars::list_cars))
                        .route("", web::post().to(cars::create_car))
                        .route("/available", web::get().to(cars::available_cars))
                        // Admin: availability windows
                        .route("/availability", web::get().to(availability::list_windows))
                        .route("/availability", web::post().to(availability::create_window))
                        .route(
                            "/availability/{id}",
                            web::patch().to(availability::update_window),
                        )
                        .route(
                            "/availability/{id}",
                            web::delete().to(availability::delete_window),
                        )
                        .route("/{id}", web::get().to(cars::get_car))
                        .route("/{id}", web::patch().to(cars::update_car))
                        .route("/{id}", web::delete().to(cars::delete_car)),
                )
                .service(
                    web::scope("/bookings")
                        .route("", web::post().to(bookings::create_booking))
                        .route("", web::get().to(bookings::list_bookings))
                        .route("/{id}", web::get().to(bookings::get_booking))
                        .route("/{id}", web::patch().to(bookings::update_booking_status)),
                )
                .service(
                    web::scope("/settings")
                        .route("", web::get().to(settings::get_settings))
                        .route("", web::put().to(settings::update_settings)),
                )
                .configure(admin::config),
        );
}
