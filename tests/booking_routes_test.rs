mod common;

use actix_web::{http::header, test};
use serde_json::{json, Value};

use common::{booking_body, TestApp};

/// Posts through a separate app instance; the store is shared.
async fn submit_booking(test_app: &TestApp, body: &Value) -> Value {
    let app = test::init_service(test_app.create_app()).await;
    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    test::read_body_json(resp).await
}

#[actix_rt::test]
async fn test_public_booking_starts_pending() {
    let test_app = TestApp::new();

    let mut body = booking_body("suv", "2024-06-12", "2024-06-20", "jane@example.com");
    body["status"] = json!("accepted");
    let created = submit_booking(&test_app, &body).await;

    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["status"], "pending");
    assert_eq!(created["data"]["customerEmail"], "jane@example.com");
    assert!(created["data"]["userId"].is_null());
    assert!(created["data"].get("rejectionReason").is_none());
}

#[actix_rt::test]
async fn test_booking_links_authenticated_user() {
    let test_app = TestApp::new();
    let user = test_app.create_user("jane", false).await;
    let token = format!("Bearer {}", test_app.auth.issue_token(&user).unwrap());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(&booking_body("suv", "2024-06-12", "2024-06-20", "jane@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["userId"], user.id.as_str());
}

#[actix_rt::test]
async fn test_booking_validation() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let cases = vec![
        booking_body("suv", "2024-06-20", "2024-06-12", "jane@example.com"),
        booking_body("suv", "2024-06-12", "2024-06-12", "jane@example.com"),
        booking_body("", "2024-06-12", "2024-06-20", "jane@example.com"),
        booking_body("suv", "2024-06-12", "2024-06-20", "not-an-email"),
    ];
    for body in cases {
        let req = test::TestRequest::post()
            .uri("/api/bookings")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "body: {}", body);
    }

    let mut unknown_car = booking_body("suv", "2024-06-12", "2024-06-20", "jane@example.com");
    unknown_car["carId"] = json!("missing");
    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .set_json(&unknown_car)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn test_booking_list_requires_admin() {
    let test_app = TestApp::new();
    let user_token = test_app.user_token().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/bookings").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get()
        .uri("/api/bookings")
        .insert_header((header::AUTHORIZATION, user_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_rt::test]
async fn test_booking_list_filters() {
    let test_app = TestApp::new();
    let token = test_app.admin_token().await;
    let app = test::init_service(test_app.create_app()).await;

    submit_booking(&test_app, &booking_body("suv", "2024-06-12", "2024-06-20", "a@example.com")).await;
    let july = submit_booking(&test_app, &booking_body("suv", "2024-07-01", "2024-07-05", "b@example.com")).await;

    let req = test::TestRequest::get()
        .uri("/api/bookings?from=2024-07-01&to=2024-07-31")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let bookings = body["data"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["id"], july["data"]["id"]);

    let req = test::TestRequest::get()
        .uri("/api/bookings?status=accepted")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri("/api/bookings?from=2024-07-31&to=2024-07-01")
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_accept_then_reject_conflicts() {
    let test_app = TestApp::new();
    let token = test_app.admin_token().await;
    let app = test::init_service(test_app.create_app()).await;

    let created = submit_booking(&test_app, &booking_body("suv", "2024-06-12", "2024-06-20", "a@example.com")).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/bookings/{}", id))
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(&json!({ "status": "accepted" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "accepted");
    assert!(body["data"]["updatedAt"].is_string());

    let req = test::TestRequest::patch()
        .uri(&format!("/api/bookings/{}", id))
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(&json!({ "status": "rejected", "rejectionReason": "Too late" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    let req = test::TestRequest::get()
        .uri(&format!("/api/bookings/{}", id))
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "accepted");
}

#[actix_rt::test]
async fn test_reject_with_and_without_reason() {
    let test_app = TestApp::new();
    let token = test_app.admin_token().await;
    let app = test::init_service(test_app.create_app()).await;

    let first = submit_booking(&test_app, &booking_body("suv", "2024-06-12", "2024-06-20", "a@example.com")).await;
    let second = submit_booking(&test_app, &booking_body("suv", "2024-06-12", "2024-06-20", "b@example.com")).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/bookings/{}", first["data"]["id"].as_str().unwrap()))
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(&json!({ "status": "rejected", "rejectionReason": "No cars left" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "rejected");
    assert_eq!(body["data"]["rejectionReason"], "No cars left");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/bookings/{}", second["data"]["id"].as_str().unwrap()))
        .insert_header((header::AUTHORIZATION, token))
        .set_json(&json!({ "status": "rejected" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "rejected");
    assert!(body["data"].get("rejectionReason").is_none());
}

#[actix_rt::test]
async fn test_status_update_edge_cases() {
    let test_app = TestApp::new();
    let token = test_app.admin_token().await;
    let app = test::init_service(test_app.create_app()).await;

    let created = submit_booking(&test_app, &booking_body("suv", "2024-06-12", "2024-06-20", "a@example.com")).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/bookings/{}", id))
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(&json!({ "status": "pending" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/bookings/{}", id))
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(&json!({ "status": "cancelled" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::patch()
        .uri("/api/bookings/missing")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(&json!({ "status": "accepted" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
