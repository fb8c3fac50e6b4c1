use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::models::{
    bookings::{Booking, BookingInput, BookingStatus, StatusChange, StatusUpdate},
    new_id,
};
use crate::services::validation::{normalize_optional, require_non_blank, require_valid_email};

pub fn validate_booking(input: &BookingInput) -> Result<(), ApiError> {
    require_non_blank("pickupLocation", &input.pickup_location)?;
    require_non_blank("returnLocation", &input.return_location)?;
    require_non_blank("carType", &input.car_type)?;

    if input.return_date <= input.pickup_date {
        return Err(ApiError::validation("returnDate must be after pickupDate"));
    }

    require_valid_email(input.email.as_deref().map(str::trim).filter(|e| !e.is_empty()))
}

/// Builds a pending booking. Availability is not re-checked here.
pub fn new_booking(input: BookingInput, user_id: Option<String>, now: DateTime<Utc>) -> Booking {
    Booking {
        id: new_id(),
        pickup_location: input.pickup_location.trim().to_string(),
        return_location: input.return_location.trim().to_string(),
        pickup_date: input.pickup_date,
        return_date: input.return_date,
        car_type: input.car_type.trim().to_string(),
        car_id: normalize_optional(input.car_id),
        user_id,
        customer_name: normalize_optional(input.name),
        customer_email: normalize_optional(input.email),
        customer_phone: normalize_optional(input.phone),
        status: BookingStatus::Pending,
        rejection_reason: None,
        created_at: now,
        updated_at: None,
    }
}

/// Turns an admin's request into the fields to write. The reason is kept only
/// for rejections, and a rejection without one is allowed.
pub fn status_update(change: StatusChange, now: DateTime<Utc>) -> Result<StatusUpdate, ApiError> {
    if change.status == BookingStatus::Pending {
        return Err(ApiError::validation(
            "status must be either accepted or rejected",
        ));
    }

    let rejection_reason = match change.status {
        BookingStatus::Rejected => normalize_optional(change.rejection_reason),
        _ => None,
    };

    Ok(StatusUpdate {
        status: change.status,
        rejection_reason,
        updated_at: now,
    })
}

/// Error for a transition the stored booking no longer allows.
pub fn transition_conflict(current: BookingStatus) -> ApiError {
    ApiError::Conflict(format!("Booking is already {}", current.as_str()))
}

pub fn sort_newest_first(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn input() -> BookingInput {
        BookingInput {
            pickup_location: "Airport".into(),
            return_location: "Downtown".into(),
            pickup_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
            car_type: "suv".into(),
            car_id: None,
            name: Some("Jane Doe".into()),
            email: Some("jane@example.com".into()),
            phone: None,
        }
    }

    #[test]
    fn test_valid_booking_passes() {
        assert!(validate_booking(&input()).is_ok());
    }

    #[test]
    fn test_missing_locations_rejected() {
        let mut booking = input();
        booking.pickup_location = "   ".into();
        let err = validate_booking(&booking).unwrap_err();
        assert_eq!(err.to_string(), "pickupLocation is required");
    }

    #[test]
    fn test_return_must_follow_pickup() {
        let mut booking = input();
        booking.return_date = booking.pickup_date;
        assert!(validate_booking(&booking).is_err());
    }

    #[test]
    fn test_bad_email_rejected_blank_email_ignored() {
        let mut booking = input();
        booking.email = Some("not-an-email".into());
        assert!(validate_booking(&booking).is_err());
        booking.email = Some("  ".into());
        assert!(validate_booking(&booking).is_ok());
    }

    #[test]
    fn test_new_booking_is_pending() {
        let booking = new_booking(input(), Some("user-1".into()), Utc::now());
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.user_id.as_deref(), Some("user-1"));
        assert!(booking.rejection_reason.is_none());
    }

    #[test]
    fn test_pending_is_not_a_target() {
        let change = StatusChange {
            status: BookingStatus::Pending,
            rejection_reason: None,
        };
        assert!(status_update(change, Utc::now()).is_err());
    }

    #[test]
    fn test_reason_kept_only_for_rejection() {
        let accepted = status_update(
            StatusChange {
                status: BookingStatus::Accepted,
                rejection_reason: Some("ignored".into()),
            },
            Utc::now(),
        )
        .unwrap();
        assert!(accepted.rejection_reason.is_none());

        let rejected = status_update(
            StatusChange {
                status: BookingStatus::Rejected,
                rejection_reason: Some("No cars left".into()),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(rejected.rejection_reason.as_deref(), Some("No cars left"));

        let bare = status_update(
            StatusChange {
                status: BookingStatus::Rejected,
                rejection_reason: None,
            },
            Utc::now(),
        )
        .unwrap();
        assert!(bare.rejection_reason.is_none());
    }

    #[test]
    fn test_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Accepted));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Rejected));
        assert!(!BookingStatus::Accepted.can_transition_to(BookingStatus::Rejected));
        assert!(!BookingStatus::Rejected.can_transition_to(BookingStatus::Accepted));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn test_sort_newest_first() {
        let now = Utc::now();
        let older = new_booking(input(), None, now - Duration::hours(1));
        let newer = new_booking(input(), None, now);
        let mut bookings = vec![older.clone(), newer.clone()];
        sort_newest_first(&mut bookings);
        assert_eq!(bookings[0].id, newer.id);
        assert_eq!(bookings[1].id, older.id);
    }
}
