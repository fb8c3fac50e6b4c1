use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

use crate::config::AppConfig;
use crate::db::{RentalStore, Store};
use crate::error::ApiError;
use crate::models::car::CarInput;
use crate::services::{auth_service::AuthService, catalogue_service};

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect()
}

/// Creates the admin account on first start. Returns true when it was created.
pub async fn ensure_admin(
    store: &Store,
    auth: &AuthService,
    username: &str,
    password: Option<&str>,
) -> Result<bool, ApiError> {
    if store.find_user_by_username(username).await?.is_some() {
        log::info!("Admin user '{}' already present", username);
        return Ok(false);
    }

    let password = match password {
        Some(password) => password.to_string(),
        None => {
            let generated = generate_password();
            log::warn!(
                "ADMIN_PASSWORD not set, generated password for '{}': {}",
                username,
                generated
            );
            generated
        }
    };

    let admin = auth.new_user(username, &password, Some("Administrator".to_string()), None, true)?;
    store.insert_user(&admin).await?;
    log::info!("Created admin user '{}'", admin.username);
    Ok(true)
}

fn demo_catalogue() -> Vec<CarInput> {
    let car = |name: &str, car_type: &str, seats: i32, power: &str, price: f64, features: &[&str]| {
        CarInput {
            name: name.to_string(),
            car_type: car_type.to_string(),
            seats,
            power: Some(power.to_string()),
            price,
            features: features.iter().map(|f| f.to_string()).collect(),
            gallery: vec![],
            available: true,
            description: None,
        }
    };

    vec![
        car("Volkswagen Golf", "compact", 5, "110 HP", 45.0, &["Air conditioning", "Bluetooth"]),
        car("Toyota RAV4", "suv", 5, "218 HP", 79.0, &["All-wheel drive", "GPS", "Bluetooth"]),
        car("Mercedes-Benz E-Class", "luxury", 5, "258 HP", 139.0, &["Leather seats", "GPS", "Heated seats"]),
        car("Ford Transit Custom", "van", 9, "130 HP", 99.0, &["9 seats", "Air conditioning"]),
    ]
}

/// Inserts a small demo catalogue when no cars exist. Returns the number added.
pub async fn seed_demo_cars(store: &Store) -> Result<usize, ApiError> {
    if !store.list_cars().await?.is_empty() {
        return Ok(0);
    }

    let mut added = 0;
    for input in demo_catalogue() {
        let car = catalogue_service::new_car(input, Utc::now())?;
        store.insert_car(&car).await?;
        added += 1;
    }
    log::info!("Seeded {} demo cars", added);
    Ok(added)
}

pub async fn seed(store: &Store, auth: &AuthService, config: &AppConfig) -> Result<(), ApiError> {
    ensure_admin(
        store,
        auth,
        &config.admin_username,
        config.admin_password.as_deref(),
    )
    .await?;

    if config.seed_demo_cars {
        seed_demo_cars(store).await?;
    }
    Ok(())
}
