use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
        }
    }

    /// Only pending bookings move, and only to a terminal status.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Accepted)
                | (BookingStatus::Pending, BookingStatus::Rejected)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub pickup_location: String,
    pub return_location: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub car_type: String,
    pub car_id: Option<String>,
    pub user_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of the public booking form. Any `status` sent by the client is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub pickup_location: String,
    pub return_location: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub car_type: String,
    pub car_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: BookingStatus,
    pub rejection_reason: Option<String>,
}

/// Fields written when a pending booking is accepted or rejected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    /// Inclusive lower bound on the pickup date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the pickup date.
    pub to: Option<NaiveDate>,
}

impl BookingFilter {
    pub fn with_status(status: BookingStatus) -> Self {
        BookingFilter {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.status.map_or(true, |status| booking.status == status)
            && self.from.map_or(true, |from| booking.pickup_date >= from)
            && self.to.map_or(true, |to| booking.pickup_date <= to)
    }
}
