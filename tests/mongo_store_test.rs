//! Runs against a live MongoDB. `MONGODB_URI=... cargo test -- --ignored`

use chrono::Utc;
use serial_test::serial;

use car_rental_api::{
    db::{mongo::create_mongo_client, MongoStore, RentalStore, StoreError},
    models::{
        bookings::{BookingFilter, BookingInput, BookingStatus, StatusChange},
        car::CarInput,
    },
    services::{auth_service::AuthService, booking_service, catalogue_service},
};

async fn test_store() -> MongoStore {
    let uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let client = create_mongo_client(&uri).await.unwrap();
    let db = client.database("car_rental_test");
    db.drop().await.unwrap();

    let store = MongoStore::new(&client, "car_rental_test");
    store.ensure_indexes().await.unwrap();
    store
}

#[actix_rt::test]
#[serial]
#[ignore]
async fn test_car_delete_cascades_windows() {
    let store = test_store().await;
    let car = catalogue_service::new_car(
        CarInput {
            name: "Toyota RAV4".to_string(),
            car_type: "suv".to_string(),
            seats: 5,
            power: None,
            price: 79.0,
            features: vec![],
            gallery: vec![],
            available: true,
            description: None,
        },
        Utc::now(),
    )
    .unwrap();
    store.insert_car(&car).await.unwrap();
    assert_eq!(store.get_car(&car.id).await.unwrap(), Some(car.clone()));

    assert!(store.delete_car(&car.id).await.unwrap());
    assert!(!store.delete_car(&car.id).await.unwrap());
    assert!(store.list_windows(Some(&car.id)).await.unwrap().is_empty());
}

#[actix_rt::test]
#[serial]
#[ignore]
async fn test_booking_transition_only_from_pending() {
    let store = test_store().await;
    let booking = booking_service::new_booking(
        BookingInput {
            pickup_location: "Paris".to_string(),
            return_location: "Paris".to_string(),
            pickup_date: "2024-06-12".parse().unwrap(),
            return_date: "2024-06-20".parse().unwrap(),
            car_type: "suv".to_string(),
            car_id: None,
            name: None,
            email: Some("jane@example.com".to_string()),
            phone: None,
        },
        None,
        Utc::now(),
    );
    store.insert_booking(&booking).await.unwrap();

    let accept = booking_service::status_update(
        StatusChange {
            status: BookingStatus::Accepted,
            rejection_reason: None,
        },
        Utc::now(),
    )
    .unwrap();
    let updated = store.transition_booking(&booking.id, &accept).await.unwrap();
    assert_eq!(updated.unwrap().status, BookingStatus::Accepted);
    assert!(store.transition_booking(&booking.id, &accept).await.unwrap().is_none());

    let accepted = store
        .list_bookings(&BookingFilter::with_status(BookingStatus::Accepted))
        .await
        .unwrap();
    assert_eq!(accepted.len(), 1);
}

#[actix_rt::test]
#[serial]
#[ignore]
async fn test_duplicate_username() {
    let store = test_store().await;
    let auth = AuthService::new("integration-test-secret-0123456789", chrono::Duration::hours(1), 4);

    let user = auth.new_user("admin", "password123", None, None, true).unwrap();
    store.insert_user(&user).await.unwrap();

    let again = auth.new_user("admin", "password123", None, None, true).unwrap();
    assert!(matches!(
        store.insert_user(&again).await,
        Err(StoreError::Duplicate(_))
    ));
}
