pub mod memory;
pub mod mongo;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    availability::CarAvailabilityWindow,
    bookings::{Booking, BookingFilter, StatusUpdate},
    car::Car,
    settings::SiteSettings,
    user::User,
};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("BSON serialization error: {0}")]
    Bson(#[from] bson::ser::Error),

    #[error("{0}")]
    Duplicate(String),
}

/// Persistence operations the API needs. Lookups by id return `Ok(None)` for
/// unknown ids; replace/delete report whether a record was touched.
pub trait RentalStore {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn list_cars(&self) -> Result<Vec<Car>, StoreError>;
    async fn get_car(&self, id: &str) -> Result<Option<Car>, StoreError>;
    async fn insert_car(&self, car: &Car) -> Result<(), StoreError>;
    async fn replace_car(&self, car: &Car) -> Result<bool, StoreError>;
    /// Removes the car together with its availability windows.
    async fn delete_car(&self, id: &str) -> Result<bool, StoreError>;

    async fn list_windows(
        &self,
        car_id: Option<&str>,
    ) -> Result<Vec<CarAvailabilityWindow>, StoreError>;
    async fn get_window(&self, id: &str) -> Result<Option<CarAvailabilityWindow>, StoreError>;
    async fn insert_window(&self, window: &CarAvailabilityWindow) -> Result<(), StoreError>;
    async fn replace_window(&self, window: &CarAvailabilityWindow) -> Result<bool, StoreError>;
    async fn delete_window(&self, id: &str) -> Result<bool, StoreError>;

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError>;
    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StoreError>;
    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError>;
    /// Applies `update` only while the booking is still pending. `Ok(None)`
    /// means no pending booking with that id exists.
    async fn transition_booking(
        &self,
        id: &str,
        update: &StatusUpdate,
    ) -> Result<Option<Booking>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError>;
    /// Fails with `StoreError::Duplicate` when the username is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn record_login(
        &self,
        user_id: &str,
        succeeded: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn get_settings(&self) -> Result<Option<SiteSettings>, StoreError>;
    async fn save_settings(&self, settings: &SiteSettings) -> Result<(), StoreError>;
}

/// The configured storage backend, shared with every worker as `web::Data<Store>`.
#[derive(Clone)]
pub enum Store {
    Mongo(MongoStore),
    Memory(MemoryStore),
}

impl Store {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Mongo(_) => "mongodb",
            Store::Memory(_) => "memory",
        }
    }
}

impl RentalStore for Store {
    async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Store::Mongo(store) => store.ping().await,
            Store::Memory(store) => store.ping().await,
        }
    }

    async fn list_cars(&self) -> Result<Vec<Car>, StoreError> {
        match self {
            Store::Mongo(store) => store.list_cars().await,
            Store::Memory(store) => store.list_cars().await,
        }
    }

    async fn get_car(&self, id: &str) -> Result<Option<Car>, StoreError> {
        match self {
            Store::Mongo(store) => store.get_car(id).await,
            Store::Memory(store) => store.get_car(id).await,
        }
    }

    async fn insert_car(&self, car: &Car) -> Result<(), StoreError> {
        match self {
            Store::Mongo(store) => store.insert_car(car).await,
            Store::Memory(store) => store.insert_car(car).await,
        }
    }

    async fn replace_car(&self, car: &Car) -> Result<bool, StoreError> {
        match self {
            Store::Mongo(store) => store.replace_car(car).await,
            Store::Memory(store) => store.replace_car(car).await,
        }
    }

    async fn delete_car(&self, id: &str) -> Result<bool, StoreError> {
        match self {
            Store::Mongo(store) => store.delete_car(id).await,
            Store::Memory(store) => store.delete_car(id).await,
        }
    }

    async fn list_windows(
        &self,
        car_id: Option<&str>,
    ) -> Result<Vec<CarAvailabilityWindow>, StoreError> {
        match self {
            Store::Mongo(store) => store.list_windows(car_id).await,
            Store::Memory(store) => store.list_windows(car_id).await,
        }
    }

    async fn get_window(&self, id: &str) -> Result<Option<CarAvailabilityWindow>, StoreError> {
        match self {
            Store::Mongo(store) => store.get_window(id).await,
            Store::Memory(store) => store.get_window(id).await,
        }
    }

    async fn insert_window(&self, window: &CarAvailabilityWindow) -> Result<(), StoreError> {
        match self {
            Store::Mongo(store) => store.insert_window(window).await,
            Store::Memory(store) => store.insert_window(window).await,
        }
    }

    async fn replace_window(&self, window: &CarAvailabilityWindow) -> Result<bool, StoreError> {
        match self {
            Store::Mongo(store) => store.replace_window(window).await,
            Store::Memory(store) => store.replace_window(window).await,
        }
    }

    async fn delete_window(&self, id: &str) -> Result<bool, StoreError> {
        match self {
            Store::Mongo(store) => store.delete_window(id).await,
            Store::Memory(store) => store.delete_window(id).await,
        }
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        match self {
            Store::Mongo(store) => store.insert_booking(booking).await,
            Store::Memory(store) => store.insert_booking(booking).await,
        }
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        match self {
            Store::Mongo(store) => store.get_booking(id).await,
            Store::Memory(store) => store.get_booking(id).await,
        }
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        match self {
            Store::Mongo(store) => store.list_bookings(filter).await,
            Store::Memory(store) => store.list_bookings(filter).await,
        }
    }

    async fn transition_booking(
        &self,
        id: &str,
        update: &StatusUpdate,
    ) -> Result<Option<Booking>, StoreError> {
        match self {
            Store::Mongo(store) => store.transition_booking(id, update).await,
            Store::Memory(store) => store.transition_booking(id, update).await,
        }
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        match self {
            Store::Mongo(store) => store.find_user_by_username(username).await,
            Store::Memory(store) => store.find_user_by_username(username).await,
        }
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        match self {
            Store::Mongo(store) => store.get_user(id).await,
            Store::Memory(store) => store.get_user(id).await,
        }
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        match self {
            Store::Mongo(store) => store.insert_user(user).await,
            Store::Memory(store) => store.insert_user(user).await,
        }
    }

    async fn record_login(
        &self,
        user_id: &str,
        succeeded: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        match self {
            Store::Mongo(store) => store.record_login(user_id, succeeded, at).await,
            Store::Memory(store) => store.record_login(user_id, succeeded, at).await,
        }
    }

    async fn get_settings(&self) -> Result<Option<SiteSettings>, StoreError> {
        match self {
            Store::Mongo(store) => store.get_settings().await,
            Store::Memory(store) => store.get_settings().await,
        }
    }

    async fn save_settings(&self, settings: &SiteSettings) -> Result<(), StoreError> {
        match self {
            Store::Mongo(store) => store.save_settings(settings).await,
            Store::Memory(store) => store.save_settings(settings).await,
        }
    }
}
