use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Date range attached to a car. `is_available == false` blocks the car for
/// every requested range the window touches. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarAvailabilityWindow {
    pub id: String,
    pub car_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_available: bool,
    pub city: Option<String>,
    pub car_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowInput {
    pub car_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_available: bool,
    pub city: Option<String>,
}

/// Partial edit. An empty `city` clears the stored city.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowUpdate {
    pub car_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_available: Option<bool>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowQuery {
    pub car_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub car_type: Option<String>,
    pub city: Option<String>,
}
