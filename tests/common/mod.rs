#![allow(dead_code)]

use actix_web::{body::MessageBody, web, App};
use chrono::{Duration, NaiveDate, Utc};

use car_rental_api::{
    build_cors,
    config::CachePolicy,
    db::{MemoryStore, RentalStore, Store},
    middleware::auth::AuthMiddleware,
    models::{
        availability::{CarAvailabilityWindow, WindowInput},
        car::{Car, CarInput},
        user::User,
    },
    routes,
    services::{auth_service::AuthService, availability_service, catalogue_service},
};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";
pub const TEST_PASSWORD: &str = "testpassword123";

pub struct TestApp {
    pub store: Store,
    pub auth: AuthService,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            store: Store::Memory(MemoryStore::new()),
            // Lowest bcrypt cost keeps the suite fast.
            auth: AuthService::new(TEST_SECRET, Duration::hours(1), 4),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(AuthMiddleware::new(self.auth.clone()))
            .wrap(build_cors(None))
            .app_data(web::Data::new(self.store.clone()))
            .app_data(web::Data::new(self.auth.clone()))
            .configure(|cfg| routes::configure(cfg, CachePolicy::new(60)))
    }

    pub async fn create_user(&self, username: &str, is_admin: bool) -> User {
        let user = self
            .auth
            .new_user(username, TEST_PASSWORD, None, None, is_admin)
            .unwrap();
        self.store.insert_user(&user).await.unwrap();
        user
    }

    /// `Authorization` header value for a freshly created admin.
    pub async fn admin_token(&self) -> String {
        let admin = self.create_user("admin", true).await;
        format!("Bearer {}", self.auth.issue_token(&admin).unwrap())
    }

    pub async fn user_token(&self) -> String {
        let user = self.create_user("customer", false).await;
        format!("Bearer {}", self.auth.issue_token(&user).unwrap())
    }

    pub async fn create_car(&self, name: &str, car_type: &str) -> Car {
        let car = catalogue_service::new_car(
            CarInput {
                name: name.to_string(),
                car_type: car_type.to_string(),
                seats: 5,
                power: None,
                price: 59.0,
                features: vec![],
                gallery: vec![],
                available: true,
                description: None,
            },
            Utc::now(),
        )
        .unwrap();
        self.store.insert_car(&car).await.unwrap();
        car
    }

    pub async fn create_window(
        &self,
        car: &Car,
        start: NaiveDate,
        end: NaiveDate,
        is_available: bool,
        city: Option<&str>,
    ) -> CarAvailabilityWindow {
        let window = availability_service::new_window(
            WindowInput {
                car_id: car.id.clone(),
                start_date: start,
                end_date: end,
                is_available,
                city: city.map(str::to_string),
            },
            car,
            Utc::now(),
        )
        .unwrap();
        self.store.insert_window(&window).await.unwrap();
        window
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn booking_body(car_type: &str, pickup: &str, return_date: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "pickupLocation": "Paris CDG",
        "returnLocation": "Paris CDG",
        "pickupDate": pickup,
        "returnDate": return_date,
        "carType": car_type,
        "name": "Jane Doe",
        "email": email,
        "phone": "+33 1 23 45 67 89"
    })
}
