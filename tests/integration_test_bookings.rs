mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn test_booking_lookup_for_caller() {
    let app = TestApp::new().await;
    let org = app.create_user("Organizer", "org@example.com").await;
    let guest = app.create_user("Guest", "guest@example.com").await;
    let event_id = app.create_event(&org, json!({ "price": 750, "category": "concert" })).await;

    let uri = format!("/api/bookings?eventId={}", event_id);

    let (status, body) = app.request("GET", &uri, Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"], Value::Null);

    let payment = json!({ "payment": { "method": "khalti", "reference": "pidx-1", "status": "paid" } });
    app.request("POST", &format!("/api/events/{}/register", event_id), Some(&guest.token), Some(payment)).await;

    let (status, body) = app.request("GET", &uri, Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["event"], event_id.as_str());
    assert_eq!(body["booking"]["eventSnapshot"]["category"], "concert");
    assert_eq!(body["booking"]["eventSnapshot"]["price"], 750.0);
    assert_eq!(body["booking"]["userSnapshot"]["name"], "Guest");
    assert_eq!(body["booking"]["paymentReference"], "pidx-1");

    // Another user sees nothing for the same event.
    let (_, body) = app.request("GET", &uri, Some(&org.token), None).await;
    assert_eq!(body["booking"], Value::Null);
}

#[tokio::test]
async fn test_booking_lookup_requires_event_id_and_auth() {
    let app = TestApp::new().await;
    let guest = app.create_user("Guest", "guest@example.com").await;

    let (status, body) = app.request("GET", "/api/bookings", Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "eventId query parameter is required");

    let (status, _) = app.request("GET", "/api/bookings?eventId=", Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.request("GET", "/api/bookings?eventId=x", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_booking_snapshot_survives_event_edit() {
    let app = TestApp::new().await;
    let org = app.create_user("Organizer", "org@example.com").await;
    let guest = app.create_user("Guest", "guest@example.com").await;
    let event_id = app.create_event(&org, json!({})).await;

    app.request("POST", &format!("/api/events/{}/register", event_id), Some(&guest.token), None).await;
    app.request("PUT", &format!("/api/events/{}", event_id), Some(&org.token), Some(json!({ "status": "completed" }))).await;

    let (_, body) = app.request("GET", &format!("/api/bookings?eventId={}", event_id), Some(&guest.token), None).await;
    assert_eq!(body["booking"]["eventSnapshot"]["title"], "Rust Kathmandu Meetup");
    assert_eq!(body["booking"]["paymentMethod"], "free");
}
