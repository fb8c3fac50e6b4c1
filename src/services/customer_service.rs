use std::collections::HashMap;

use crate::models::{
    bookings::{Booking, BookingStatus},
    customer::CustomerInfo,
};

/// Groups accepted bookings by email. Output follows the order in which each
/// email first appears; contact details come from the newest booking.
pub fn derive_customers(bookings: &[Booking]) -> Vec<CustomerInfo> {
    let mut customers: Vec<CustomerInfo> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for booking in bookings
        .iter()
        .filter(|booking| booking.status == BookingStatus::Accepted)
    {
        let email = match booking.customer_email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => email.to_lowercase(),
            _ => continue,
        };

        match index.get(&email) {
            Some(&position) => {
                let customer = &mut customers[position];
                customer.bookings.push(booking.clone());
                customer.total_bookings = customer.bookings.len();
                if booking.created_at > customer.latest_booking.created_at {
                    customer.name = booking.customer_name.clone();
                    customer.phone = booking.customer_phone.clone();
                    customer.latest_booking = booking.clone();
                }
            }
            None => {
                index.insert(email.clone(), customers.len());
                customers.push(CustomerInfo {
                    email,
                    name: booking.customer_name.clone(),
                    phone: booking.customer_phone.clone(),
                    total_bookings: 1,
                    latest_booking: booking.clone(),
                    bookings: vec![booking.clone()],
                });
            }
        }
    }

    customers
}
