use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteError, WriteFailure},
    options::{ClientOptions, IndexOptions, ReturnDocument, ServerApi, ServerApiVersion},
    Client, Collection, Database, IndexModel,
};
use std::time::Duration;

use crate::db::{RentalStore, StoreError};
use crate::models::{
    availability::CarAvailabilityWindow,
    bookings::{Booking, BookingFilter, BookingStatus, StatusUpdate},
    car::Car,
    settings::SiteSettings,
    user::User,
};

const DUPLICATE_KEY: i32 = 11000;

pub async fn create_mongo_client(uri: &str) -> Result<Client, StoreError> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.app_name = Some("car-rental-api".to_string());
    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    // A failed ping is not fatal; the driver reconnects on demand.
    match client.database("admin").run_command(doc! {"ping": 1}).await {
        Ok(_) => log::info!("Connected to MongoDB and verified with ping"),
        Err(e) => log::warn!("Connected to MongoDB but ping failed: {}", e),
    }

    Ok(client)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(WriteError { code, .. })) if *code == DUPLICATE_KEY
    )
}

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(client: &Client, database: &str) -> Self {
        MongoStore {
            db: client.database(database),
        }
    }

    fn cars(&self) -> Collection<Car> {
        self.db.collection("cars")
    }

    fn windows(&self) -> Collection<CarAvailabilityWindow> {
        self.db.collection("availability")
    }

    fn bookings(&self) -> Collection<Booking> {
        self.db.collection("bookings")
    }

    fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    fn settings(&self) -> Collection<SiteSettings> {
        self.db.collection("settings")
    }

    /// Unique `id` on every collection, unique `username` on users, plus the
    /// lookup keys used by the availability and booking queries.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique = || IndexOptions::builder().unique(true).build();
        let unique_key = |field: &str| {
            let mut keys = Document::new();
            keys.insert(field, 1);
            IndexModel::builder().keys(keys).options(unique()).build()
        };

        self.cars().create_index(unique_key("id")).await?;
        self.windows().create_index(unique_key("id")).await?;
        self.bookings().create_index(unique_key("id")).await?;
        self.users().create_index(unique_key("id")).await?;
        self.users().create_index(unique_key("username")).await?;

        self.windows()
            .create_index(IndexModel::builder().keys(doc! { "carId": 1 }).build())
            .await?;
        self.bookings()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "status": 1, "pickupDate": 1 })
                    .build(),
            )
            .await?;

        log::info!("MongoDB indexes ensured");
        Ok(())
    }
}

fn booking_filter_doc(filter: &BookingFilter) -> Document {
    let mut query = doc! {};
    if let Some(status) = filter.status {
        query.insert("status", status.as_str());
    }

    // Dates are stored as ISO strings, so lexical comparison is date order.
    let mut pickup = doc! {};
    if let Some(from) = filter.from {
        pickup.insert("$gte", from.to_string());
    }
    if let Some(to) = filter.to {
        pickup.insert("$lte", to.to_string());
    }
    if !pickup.is_empty() {
        query.insert("pickupDate", pickup);
    }
    query
}

impl RentalStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! {"ping": 1}).await?;
        Ok(())
    }

    async fn list_cars(&self) -> Result<Vec<Car>, StoreError> {
        let cursor = self.cars().find(doc! {}).sort(doc! { "_id": 1 }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn get_car(&self, id: &str) -> Result<Option<Car>, StoreError> {
        Ok(self.cars().find_one(doc! { "id": id }).await?)
    }

    async fn insert_car(&self, car: &Car) -> Result<(), StoreError> {
        self.cars().insert_one(car).await?;
        Ok(())
    }

    async fn replace_car(&self, car: &Car) -> Result<bool, StoreError> {
        let result = self.cars().replace_one(doc! { "id": car.id.as_str() }, car).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_car(&self, id: &str) -> Result<bool, StoreError> {
        let result = self.cars().delete_one(doc! { "id": id }).await?;
        if result.deleted_count == 0 {
            return Ok(false);
        }
        let windows = self.windows().delete_many(doc! { "carId": id }).await?;
        log::info!(
            "Deleted car {} and {} availability windows",
            id,
            windows.deleted_count
        );
        Ok(true)
    }

    async fn list_windows(
        &self,
        car_id: Option<&str>,
    ) -> Result<Vec<CarAvailabilityWindow>, StoreError> {
        let filter = match car_id {
            Some(car_id) => doc! { "carId": car_id },
            None => doc! {},
        };
        let cursor = self.windows().find(filter).sort(doc! { "_id": 1 }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn get_window(&self, id: &str) -> Result<Option<CarAvailabilityWindow>, StoreError> {
        Ok(self.windows().find_one(doc! { "id": id }).await?)
    }

    async fn insert_window(&self, window: &CarAvailabilityWindow) -> Result<(), StoreError> {
        self.windows().insert_one(window).await?;
        Ok(())
    }

    async fn replace_window(&self, window: &CarAvailabilityWindow) -> Result<bool, StoreError> {
        let result = self
            .windows()
            .replace_one(doc! { "id": window.id.as_str() }, window)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_window(&self, id: &str) -> Result<bool, StoreError> {
        let result = self.windows().delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        self.bookings().insert_one(booking).await?;
        Ok(())
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings().find_one(doc! { "id": id }).await?)
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let cursor = self
            .bookings()
            .find(booking_filter_doc(filter))
            .sort(doc! { "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn transition_booking(
        &self,
        id: &str,
        update: &StatusUpdate,
    ) -> Result<Option<Booking>, StoreError> {
        let changes = bson::to_document(update)?;
        let booking = self
            .bookings()
            .find_one_and_update(
                doc! { "id": id, "status": BookingStatus::Pending.as_str() },
                doc! { "$set": changes },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(booking)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "username": username }).await?)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "id": id }).await?)
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        match self.users().insert_one(user).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => {
                Err(StoreError::Duplicate("Username already exists".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn record_login(
        &self,
        user_id: &str,
        succeeded: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let update = if succeeded {
            doc! {
                "$set": {
                    "lastLoginAt": bson::to_bson(&at)?,
                    "failedLogins": 0
                }
            }
        } else {
            doc! { "$inc": { "failedLogins": 1 } }
        };
        self.users().update_one(doc! { "id": user_id }, update).await?;
        Ok(())
    }

    async fn get_settings(&self) -> Result<Option<SiteSettings>, StoreError> {
        Ok(self.settings().find_one(doc! {}).await?)
    }

    async fn save_settings(&self, settings: &SiteSettings) -> Result<(), StoreError> {
        self.settings()
            .replace_one(doc! {}, settings)
            .upsert(true)
            .await?;
        Ok(())
    }
}
