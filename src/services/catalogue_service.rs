use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::models::{
    car::{Car, CarInput, CarUpdate},
    new_id,
};
use crate::services::validation::{normalize_optional, require_non_blank};

fn validate_car(car: &Car) -> Result<(), ApiError> {
    require_non_blank("name", &car.name)?;
    require_non_blank("type", &car.car_type)?;
    if car.seats < 1 {
        return Err(ApiError::validation("seats must be at least 1"));
    }
    if !car.price.is_finite() || car.price < 0.0 {
        return Err(ApiError::validation("price must be a non-negative number"));
    }
    Ok(())
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

pub fn new_car(input: CarInput, now: DateTime<Utc>) -> Result<Car, ApiError> {
    let car = Car {
        id: new_id(),
        name: input.name.trim().to_string(),
        car_type: input.car_type.trim().to_string(),
        seats: input.seats,
        power: normalize_optional(input.power),
        price: input.price,
        features: clean_list(input.features),
        gallery: clean_list(input.gallery),
        available: input.available,
        description: normalize_optional(input.description),
        created_at: now,
        updated_at: None,
    };
    validate_car(&car)?;
    Ok(car)
}

/// Returns the edited copy; the original is untouched when validation fails.
pub fn apply_car_update(car: &Car, update: CarUpdate, now: DateTime<Utc>) -> Result<Car, ApiError> {
    let mut edited = car.clone();
    if let Some(name) = update.name {
        edited.name = name.trim().to_string();
    }
    if let Some(car_type) = update.car_type {
        edited.car_type = car_type.trim().to_string();
    }
    if let Some(seats) = update.seats {
        edited.seats = seats;
    }
    if update.power.is_some() {
        edited.power = normalize_optional(update.power);
    }
    if let Some(price) = update.price {
        edited.price = price;
    }
    if let Some(features) = update.features {
        edited.features = clean_list(features);
    }
    if let Some(gallery) = update.gallery {
        edited.gallery = clean_list(gallery);
    }
    if let Some(available) = update.available {
        edited.available = available;
    }
    if update.description.is_some() {
        edited.description = normalize_optional(update.description);
    }
    edited.updated_at = Some(now);

    validate_car(&edited)?;
    Ok(edited)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CarInput {
        CarInput {
            name: " VW Golf ".into(),
            car_type: "compact".into(),
            seats: 5,
            power: Some("110 HP".into()),
            price: 45.0,
            features: vec!["GPS".into(), " ".into()],
            gallery: vec![],
            available: true,
            description: None,
        }
    }

    #[test]
    fn test_new_car_trims_and_cleans() {
        let car = new_car(input(), Utc::now()).unwrap();
        assert_eq!(car.name, "VW Golf");
        assert_eq!(car.features, vec!["GPS".to_string()]);
    }

    #[test]
    fn test_new_car_validation() {
        let mut bad = input();
        bad.seats = 0;
        assert!(new_car(bad, Utc::now()).is_err());

        let mut bad = input();
        bad.price = -1.0;
        assert!(new_car(bad, Utc::now()).is_err());

        let mut bad = input();
        bad.car_type = "".into();
        assert!(new_car(bad, Utc::now()).is_err());
    }

    #[test]
    fn test_partial_update() {
        let car = new_car(input(), Utc::now()).unwrap();
        let update = CarUpdate {
            price: Some(60.0),
            available: Some(false),
            ..Default::default()
        };
        let edited = apply_car_update(&car, update, Utc::now()).unwrap();
        assert_eq!(edited.price, 60.0);
        assert!(!edited.available);
        assert_eq!(edited.name, car.name);
        assert!(edited.updated_at.is_some());
    }

    #[test]
    fn test_invalid_update_rejected() {
        let car = new_car(input(), Utc::now()).unwrap();
        let update = CarUpdate {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(apply_car_update(&car, update, Utc::now()).is_err());
    }
}
