use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::{RentalStore, StoreError};
use crate::models::{
    availability::CarAvailabilityWindow,
    bookings::{Booking, BookingFilter, StatusUpdate},
    car::Car,
    settings::SiteSettings,
    user::User,
};

#[derive(Default)]
struct MemoryData {
    cars: Vec<Car>,
    windows: Vec<CarAvailabilityWindow>,
    bookings: Vec<Booking>,
    users: Vec<User>,
    settings: Option<SiteSettings>,
}

/// In-process store for development and tests. Records keep insertion order,
/// matching the `_id` ordering of the MongoDB store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RentalStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_cars(&self) -> Result<Vec<Car>, StoreError> {
        Ok(self.data.read().await.cars.clone())
    }

    async fn get_car(&self, id: &str) -> Result<Option<Car>, StoreError> {
        let data = self.data.read().await;
        Ok(data.cars.iter().find(|car| car.id == id).cloned())
    }

    async fn insert_car(&self, car: &Car) -> Result<(), StoreError> {
        self.data.write().await.cars.push(car.clone());
        Ok(())
    }

    async fn replace_car(&self, car: &Car) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        match data.cars.iter_mut().find(|stored| stored.id == car.id) {
            Some(stored) => {
                *stored = car.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_car(&self, id: &str) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        let before = data.cars.len();
        data.cars.retain(|car| car.id != id);
        if data.cars.len() == before {
            return Ok(false);
        }
        data.windows.retain(|window| window.car_id != id);
        Ok(true)
    }

    async fn list_windows(
        &self,
        car_id: Option<&str>,
    ) -> Result<Vec<CarAvailabilityWindow>, StoreError> {
        let data = self.data.read().await;
        Ok(data
            .windows
            .iter()
            .filter(|window| car_id.map_or(true, |car_id| window.car_id == car_id))
            .cloned()
            .collect())
    }

    async fn get_window(&self, id: &str) -> Result<Option<CarAvailabilityWindow>, StoreError> {
        let data = self.data.read().await;
        Ok(data.windows.iter().find(|window| window.id == id).cloned())
    }

    async fn insert_window(&self, window: &CarAvailabilityWindow) -> Result<(), StoreError> {
        self.data.write().await.windows.push(window.clone());
        Ok(())
    }

    async fn replace_window(&self, window: &CarAvailabilityWindow) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        match data.windows.iter_mut().find(|stored| stored.id == window.id) {
            Some(stored) => {
                *stored = window.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_window(&self, id: &str) -> Result<bool, StoreError> {
        let mut data = self.data.write().await;
        let before = data.windows.len();
        data.windows.retain(|window| window.id != id);
        Ok(data.windows.len() != before)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        self.data.write().await.bookings.push(booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        let data = self.data.read().await;
        Ok(data.bookings.iter().find(|booking| booking.id == id).cloned())
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let data = self.data.read().await;
        Ok(data
            .bookings
            .iter()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect())
    }

    async fn transition_booking(
        &self,
        id: &str,
        update: &StatusUpdate,
    ) -> Result<Option<Booking>, StoreError> {
        let mut data = self.data.write().await;
        let booking = data
            .bookings
            .iter_mut()
            .find(|booking| booking.id == id && booking.status.can_transition_to(update.status));

        Ok(booking.map(|booking| {
            booking.status = update.status;
            if update.rejection_reason.is_some() {
                booking.rejection_reason = update.rejection_reason.clone();
            }
            booking.updated_at = Some(update.updated_at);
            booking.clone()
        }))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|user| user.username == username).cloned())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|user| user.id == id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        if data.users.iter().any(|stored| stored.username == user.username) {
            return Err(StoreError::Duplicate("Username already exists".to_string()));
        }
        data.users.push(user.clone());
        Ok(())
    }

    async fn record_login(
        &self,
        user_id: &str,
        succeeded: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        if let Some(user) = data.users.iter_mut().find(|user| user.id == user_id) {
            if succeeded {
                user.last_login_at = Some(at);
                user.failed_logins = 0;
            } else {
                user.failed_logins += 1;
            }
        }
        Ok(())
    }

    async fn get_settings(&self) -> Result<Option<SiteSettings>, StoreError> {
        Ok(self.data.read().await.settings.clone())
    }

    async fn save_settings(&self, settings: &SiteSettings) -> Result<(), StoreError> {
        self.data.write().await.settings = Some(settings.clone());
        Ok(())
    }
}
