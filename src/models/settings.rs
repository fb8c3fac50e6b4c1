use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_text: String,
    pub default_currency: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            site_name: "Car Rental".to_string(),
            primary_color: "#1e3a8a".to_string(),
            secondary_color: "#f59e0b".to_string(),
            logo_text: "CarRental".to_string(),
            default_currency: "USD".to_string(),
            contact_email: None,
            contact_phone: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub site_name: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo_text: Option<String>,
    pub default_currency: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}
