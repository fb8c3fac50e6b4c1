pub mod auth_service;
pub mod availability_service;
pub mod booking_service;
pub mod catalogue_service;
pub mod customer_service;
pub mod seed_service;
pub mod settings_service;
pub mod validation;
