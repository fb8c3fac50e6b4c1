use crate::error::ApiError;

pub fn require_non_blank(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Trims the value and turns blank strings into `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn is_valid_email(email: &str) -> bool {
    let re = regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
    );
    re.map(|re| re.is_match(email)).unwrap_or(false)
}

pub fn require_valid_email(email: Option<&str>) -> Result<(), ApiError> {
    match email {
        Some(email) if !is_valid_email(email) => {
            Err(ApiError::Validation("Invalid email address".to_string()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jane.doe@example.com"));
        assert!(!is_valid_email("jane.doe"));
        assert!(!is_valid_email("jane@"));
        assert!(require_valid_email(None).is_ok());
        assert!(require_valid_email(Some("nope")).is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  x ".into())), Some("x".to_string()));
        assert_eq!(normalize_optional(Some("   ".into())), None);
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn test_require_non_blank() {
        assert!(require_non_blank("name", "Golf").is_ok());
        let err = require_non_blank("name", "  ").unwrap_err();
        assert_eq!(err.to_string(), "name is required");
    }
}
