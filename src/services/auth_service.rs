use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::models::{new_id, user::User};
use crate::services::validation::{normalize_optional, require_valid_email};

const MIN_PASSWORD_LEN: usize = 8;
const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=64;

/// Password hashing plus issuing, checking and revoking bearer tokens.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    bcrypt_cost: u32,
    // jti -> exp of logged-out tokens; entries go away once the token expires
    revoked: Arc<RwLock<HashMap<String, usize>>>,
}

impl AuthService {
    pub fn new(secret: &str, token_ttl: Duration, bcrypt_cost: u32) -> Self {
        AuthService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
            bcrypt_cost,
            revoked: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::hours(config.token_ttl_hours),
            config.bcrypt_cost,
        )
    }

    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    pub fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.username.clone(),
            user_id: user.id.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp() as usize,
            exp: (now + self.token_ttl).timestamp() as usize,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Token generation failed: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|err| {
                log::debug!("Error decoding token: {:?}", err);
                ApiError::Authentication("Invalid token".to_string())
            })?
            .claims;

        if self.is_revoked(&claims.jti) {
            return Err(ApiError::Authentication("Token has been revoked".to_string()));
        }
        Ok(claims)
    }

    pub fn revoke(&self, claims: &Claims) {
        let now = Utc::now().timestamp() as usize;
        match self.revoked.write() {
            Ok(mut revoked) => {
                revoked.retain(|_, exp| *exp >= now);
                revoked.insert(claims.jti.clone(), claims.exp);
            }
            Err(_) => log::error!("Token revocation list is poisoned"),
        }
    }

    fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .map(|revoked| revoked.contains_key(jti))
            .unwrap_or(false)
    }

    /// Builds a new account. Public callers always get a regular user.
    pub fn new_user(
        &self,
        username: &str,
        password: &str,
        full_name: Option<String>,
        email: Option<String>,
        is_admin: bool,
    ) -> Result<User, ApiError> {
        let username = username.trim();
        if !USERNAME_LEN.contains(&username.chars().count()) {
            return Err(ApiError::validation(
                "username must be between 3 and 64 characters",
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(
                "password must be at least 8 characters",
            ));
        }
        let email = normalize_optional(email);
        require_valid_email(email.as_deref())?;

        Ok(User {
            id: new_id(),
            username: username.to_string(),
            password_hash: self.hash_password(password)?,
            is_admin,
            full_name: normalize_optional(full_name),
            email,
            created_at: Utc::now(),
            last_login_at: None,
            failed_logins: 0,
        })
    }
}
