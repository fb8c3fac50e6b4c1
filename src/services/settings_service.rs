use chrono::{DateTime, Utc};
use regex::Regex;

use crate::db::{RentalStore, Store};
use crate::error::ApiError;
use crate::models::settings::{SettingsUpdate, SiteSettings};
use crate::services::validation::{normalize_optional, require_non_blank, require_valid_email};

fn is_hex_color(value: &str) -> bool {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$")
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

fn is_currency_code(value: &str) -> bool {
    value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase())
}

pub fn validate_settings(settings: &SiteSettings) -> Result<(), ApiError> {
    require_non_blank("siteName", &settings.site_name)?;
    require_non_blank("logoText", &settings.logo_text)?;
    for (field, color) in [
        ("primaryColor", &settings.primary_color),
        ("secondaryColor", &settings.secondary_color),
    ] {
        if !is_hex_color(color) {
            return Err(ApiError::Validation(format!(
                "{} must be a hex color like #1e3a8a",
                field
            )));
        }
    }
    if !is_currency_code(&settings.default_currency) {
        return Err(ApiError::validation(
            "defaultCurrency must be a three-letter ISO code",
        ));
    }
    require_valid_email(settings.contact_email.as_deref())
}

/// Stored settings, or the built-in defaults when none were saved yet.
pub async fn current_settings(store: &Store) -> Result<SiteSettings, ApiError> {
    Ok(store.get_settings().await?.unwrap_or_default())
}

pub fn apply_settings_update(
    current: SiteSettings,
    update: SettingsUpdate,
    now: DateTime<Utc>,
) -> Result<SiteSettings, ApiError> {
    let mut settings = current;
    if let Some(site_name) = update.site_name {
        settings.site_name = site_name.trim().to_string();
    }
    if let Some(primary_color) = update.primary_color {
        settings.primary_color = primary_color.trim().to_string();
    }
    if let Some(secondary_color) = update.secondary_color {
        settings.secondary_color = secondary_color.trim().to_string();
    }
    if let Some(logo_text) = update.logo_text {
        settings.logo_text = logo_text.trim().to_string();
    }
    if let Some(currency) = update.default_currency {
        settings.default_currency = currency.trim().to_uppercase();
    }
    if update.contact_email.is_some() {
        settings.contact_email = normalize_optional(update.contact_email);
    }
    if update.contact_phone.is_some() {
        settings.contact_phone = normalize_optional(update.contact_phone);
    }
    settings.updated_at = Some(now);

    validate_settings(&settings)?;
    Ok(settings)
}
