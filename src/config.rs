use std::{env, fmt};

use thiserror::Error;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const MONGODB_DATABASE: &str = "car_rental";
const TOKEN_TTL_HOURS: i64 = 24;
const CACHE_MAX_AGE_SECS: u64 = 60;
const MIN_SECRET_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Mongo { uri: String, database: String },
    Memory,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub seed_demo_cars: bool,
    pub cors_allowed_origin: Option<String>,
    pub cache_max_age_secs: u64,
}

// Secrets stay out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let storage = match &self.storage {
            StorageConfig::Mongo { database, .. } => format!("mongodb ({})", database),
            StorageConfig::Memory => "memory".to_string(),
        };
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("storage", &storage)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("admin_username", &self.admin_username)
            .field("seed_demo_cars", &self.seed_demo_cars)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("cache_max_age_secs", &self.cache_max_age_secs)
            .finish_non_exhaustive()
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

fn parse_bool(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let storage = match get("STORAGE")
            .unwrap_or_else(|| "mongodb".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "mongodb" | "mongo" => StorageConfig::Mongo {
                uri: get("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?,
                database: get("MONGODB_DATABASE").unwrap_or_else(|| MONGODB_DATABASE.to_string()),
            },
            "memory" => StorageConfig::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE",
                    value: other.to_string(),
                })
            }
        };

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                value: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }

        let port = match get("PORT") {
            Some(value) => parse("PORT", value)?,
            None => PORT,
        };
        let token_ttl_hours: i64 = match get("TOKEN_TTL_HOURS") {
            Some(value) => parse("TOKEN_TTL_HOURS", value)?,
            None => TOKEN_TTL_HOURS,
        };
        if token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                name: "TOKEN_TTL_HOURS",
                value: token_ttl_hours.to_string(),
            });
        }
        let bcrypt_cost: u32 = match get("BCRYPT_COST") {
            Some(value) => parse("BCRYPT_COST", value)?,
            None => bcrypt::DEFAULT_COST,
        };
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(AppConfig {
            host: get("HOST").unwrap_or_else(|| HOST.to_string()),
            port,
            storage,
            jwt_secret,
            token_ttl_hours,
            bcrypt_cost,
            admin_username: get("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            admin_password: get("ADMIN_PASSWORD"),
            seed_demo_cars: match get("SEED_DEMO_CARS") {
                Some(value) => parse_bool("SEED_DEMO_CARS", value)?,
                None => false,
            },
            cors_allowed_origin: get("CORS_ALLOWED_ORIGIN"),
            cache_max_age_secs: match get("CACHE_MAX_AGE_SECS") {
                Some(value) => parse("CACHE_MAX_AGE_SECS", value)?,
                None => CACHE_MAX_AGE_SECS,
            },
        })
    }
}

/// `Cache-Control` policy for public catalogue and settings reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age_secs: u64,
}

impl CachePolicy {
    pub fn new(max_age_secs: u64) -> Self {
        CachePolicy { max_age_secs }
    }

    pub fn header_value(&self) -> String {
        if self.max_age_secs == 0 {
            "no-store".to_string()
        } else {
            format!("public, max-age={}", self.max_age_secs)
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(CACHE_MAX_AGE_SECS)
    }
}
