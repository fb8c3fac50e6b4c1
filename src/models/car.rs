use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub car_type: String,
    pub seats: i32,
    pub power: Option<String>,
    /// Daily rate in the site's default currency.
    pub price: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    pub available: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInput {
    pub name: String,
    #[serde(rename = "type")]
    pub car_type: String,
    pub seats: i32,
    pub power: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    pub description: Option<String>,
}

fn default_available() -> bool {
    true
}

/// Partial edit; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub car_type: Option<String>,
    pub seats: Option<i32>,
    pub power: Option<String>,
    pub price: Option<f64>,
    pub features: Option<Vec<String>>,
    pub gallery: Option<Vec<String>>,
    pub available: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CarQuery {
    #[serde(rename = "type")]
    pub car_type: Option<String>,
}
