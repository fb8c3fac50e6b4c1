use serde::Serialize;

use crate::models::bookings::Booking;

/// Read-side projection of one customer's accepted bookings. Never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub total_bookings: usize,
    pub latest_booking: Booking,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Serialize)]
pub struct BookingCounts {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub cars: usize,
    pub bookings: BookingCounts,
    pub customers: usize,
}
