use chrono::{DateTime, NaiveDate, Utc};

use crate::db::{RentalStore, Store};
use crate::error::ApiError;
use crate::models::{
    availability::{CarAvailabilityWindow, WindowInput, WindowUpdate},
    car::Car,
    new_id,
};
use crate::services::validation::normalize_optional;

/// Requested rental period. Construction guarantees `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ApiError> {
        if end <= start {
            return Err(ApiError::validation("endDate must be after startDate"));
        }
        Ok(DateRange { start, end })
    }

    pub fn overlaps(&self, window: &CarAvailabilityWindow) -> bool {
        window.start_date <= self.end && window.end_date >= self.start
    }
}

#[derive(Debug, Default, Clone)]
pub struct AvailabilityFilters {
    pub car_type: Option<String>,
    pub city: Option<String>,
}

impl AvailabilityFilters {
    pub fn new(car_type: Option<String>, city: Option<String>) -> Self {
        AvailabilityFilters {
            car_type: normalize_optional(car_type),
            city: normalize_optional(city),
        }
    }
}

/// True when any blocked window of the car touches the range. Open windows
/// never cancel a blocked one.
pub fn is_blocked(car_id: &str, windows: &[CarAvailabilityWindow], range: &DateRange) -> bool {
    windows
        .iter()
        .filter(|window| window.car_id == car_id && !window.is_available)
        .any(|window| range.overlaps(window))
}

/// Cars without city-tagged windows serve every city.
fn serves_city(car_id: &str, windows: &[CarAvailabilityWindow], city: &str) -> bool {
    let mut cities = windows
        .iter()
        .filter(|window| window.car_id == car_id)
        .filter_map(|window| window.city.as_deref())
        .peekable();

    if cities.peek().is_none() {
        return true;
    }
    cities.any(|window_city| window_city.trim().eq_ignore_ascii_case(city))
}

pub fn find_available_cars(
    cars: Vec<Car>,
    windows: &[CarAvailabilityWindow],
    range: &DateRange,
    filters: &AvailabilityFilters,
) -> Vec<Car> {
    cars.into_iter()
        .filter(|car| {
            filters
                .car_type
                .as_deref()
                .map_or(true, |car_type| car.car_type.eq_ignore_ascii_case(car_type))
        })
        .filter(|car| {
            filters
                .city
                .as_deref()
                .map_or(true, |city| serves_city(&car.id, windows, city))
        })
        .filter(|car| !is_blocked(&car.id, windows, range))
        .collect()
}

pub async fn available_cars(
    store: &Store,
    range: &DateRange,
    filters: &AvailabilityFilters,
) -> Result<Vec<Car>, ApiError> {
    let cars = store.list_cars().await?;
    let windows = store.list_windows(None).await?;
    let available = find_available_cars(cars, &windows, range, filters);
    log::debug!(
        "{} cars available between {} and {}",
        available.len(),
        range.start,
        range.end
    );
    Ok(available)
}

fn validate_window_dates(start: NaiveDate, end: NaiveDate) -> Result<(), ApiError> {
    if start > end {
        return Err(ApiError::validation(
            "startDate must be on or before endDate",
        ));
    }
    Ok(())
}

pub fn new_window(
    input: WindowInput,
    car: &Car,
    now: DateTime<Utc>,
) -> Result<CarAvailabilityWindow, ApiError> {
    validate_window_dates(input.start_date, input.end_date)?;

    Ok(CarAvailabilityWindow {
        id: new_id(),
        car_id: car.id.clone(),
        start_date: input.start_date,
        end_date: input.end_date,
        is_available: input.is_available,
        city: normalize_optional(input.city),
        car_type: Some(car.car_type.clone()),
        created_at: now,
        updated_at: None,
    })
}

/// `car` is the car the window points at after the update; its type
/// refreshes the cached `car_type`.
pub fn apply_window_update(
    window: &mut CarAvailabilityWindow,
    update: WindowUpdate,
    car: &Car,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    let start_date = update.start_date.unwrap_or(window.start_date);
    let end_date = update.end_date.unwrap_or(window.end_date);
    validate_window_dates(start_date, end_date)?;

    window.car_id = car.id.clone();
    window.car_type = Some(car.car_type.clone());
    window.start_date = start_date;
    window.end_date = end_date;
    if let Some(is_available) = update.is_available {
        window.is_available = is_available;
    }
    if update.city.is_some() {
        window.city = normalize_optional(update.city);
    }
    window.updated_at = Some(now);
    Ok(())
}
