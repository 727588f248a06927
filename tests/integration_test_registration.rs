mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_register_free_event_defaults_to_free_paid() {
    let app = TestApp::new().await;
    let org = app.create_user("Organizer", "org@example.com").await;
    let guest = app.create_user("Guest", "guest@example.com").await;
    let event_id = app.create_event(&org, json!({})).await;

    let (status, body) = app.request("POST", &format!("/api/events/{}/register", event_id), Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Successfully registered for event");
    assert_eq!(body["booking"]["event"], event_id.as_str());
    assert_eq!(body["booking"]["user"], guest.id.as_str());
    assert_eq!(body["booking"]["paymentMethod"], "free");
    assert_eq!(body["booking"]["paymentStatus"], "paid");
    assert_eq!(body["booking"]["eventSnapshot"]["title"], "Rust Kathmandu Meetup");
    assert_eq!(body["booking"]["userSnapshot"]["email"], "guest@example.com");

    let (_, body) = app.request("GET", &format!("/api/events/{}", event_id), None, None).await;
    let attendees = body["event"]["attendees"].as_array().unwrap();
    assert_eq!(attendees.len(), 1);
    assert_eq!(attendees[0]["user"], guest.id.as_str());
    assert_eq!(attendees[0]["status"], "registered");

    let registered = app.state.user_repo.registered_event_ids(&guest.id).await.unwrap();
    assert_eq!(registered, vec![event_id.clone()]);
}

#[tokio::test]
async fn test_register_paid_event_with_and_without_payment() {
    let app = TestApp::new().await;
    let org = app.create_user("Organizer", "org@example.com").await;
    let payer = app.create_user("Payer", "payer@example.com").await;
    let later = app.create_user("Later", "later@example.com").await;
    let event_id = app.create_event(&org, json!({ "price": 1500 })).await;
    let uri = format!("/api/events/{}/register", event_id);

    let payment = json!({ "payment": {
        "method": "khalti",
        "reference": "idx-123",
        "transactionId": "txn-9",
        "status": "paid"
    }});
    let (status, body) = app.request("POST", &uri, Some(&payer.token), Some(payment)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["paymentMethod"], "khalti");
    assert_eq!(body["booking"]["paymentStatus"], "paid");
    assert_eq!(body["booking"]["paymentReference"], "idx-123");
    assert_eq!(body["booking"]["transactionId"], "txn-9");

    let (status, body) = app.request("POST", &uri, Some(&later.token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["paymentMethod"], "none");
    assert_eq!(body["booking"]["paymentStatus"], "pending");

    let (_, body) = app.request("GET", &format!("/api/events/{}", event_id), None, None).await;
    let attendees = body["event"]["attendees"].as_array().unwrap();
    assert_eq!(attendees[0]["paymentMethod"], "khalti");
    assert_eq!(attendees[0]["paymentReference"], "idx-123");
    assert_eq!(attendees[1]["paymentStatus"], "pending");
}

#[tokio::test]
async fn test_invalid_payment_method_is_rejected() {
    let app = TestApp::new().await;
    let org = app.create_user("Organizer", "org@example.com").await;
    let guest = app.create_user("Guest", "guest@example.com").await;
    let event_id = app.create_event(&org, json!({ "price": 100 })).await;
    let uri = format!("/api/events/{}/register", event_id);

    for method in ["paypal", "pending"] {
        let (status, _) = app.request("POST", &uri, Some(&guest.token), Some(json!({ "payment": { "method": method } }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "method {}", method);
    }

    let (_, body) = app.request("GET", &format!("/api/events/{}", event_id), None, None).await;
    assert_eq!(body["event"]["attendees"], json!([]));
}

#[tokio::test]
async fn test_register_twice_keeps_single_attendee() {
    let app = TestApp::new().await;
    let org = app.create_user("Organizer", "org@example.com").await;
    let guest = app.create_user("Guest", "guest@example.com").await;
    let event_id = app.create_event(&org, json!({})).await;
    let uri = format!("/api/events/{}/register", event_id);

    let (status, _) = app.request("POST", &uri, Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request("POST", &uri, Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Already registered for this event");

    let (_, body) = app.request("GET", &format!("/api/events/{}", event_id), None, None).await;
    assert_eq!(body["event"]["attendees"].as_array().unwrap().len(), 1);
    assert_eq!(app.emails.sent().len(), 1);
}

#[tokio::test]
async fn test_full_event_rejects_and_stays_unchanged() {
    let app = TestApp::new().await;
    let org = app.create_user("Organizer", "org@example.com").await;
    let first = app.create_user("First", "first@example.com").await;
    let second = app.create_user("Second", "second@example.com").await;
    let event_id = app.create_event(&org, json!({ "capacity": 1 })).await;
    let uri = format!("/api/events/{}/register", event_id);

    let (status, _) = app.request("POST", &uri, Some(&first.token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, before) = app.request("GET", &format!("/api/events/{}", event_id), None, None).await;

    let (status, body) = app.request("POST", &uri, Some(&second.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Event is full");

    let (_, after) = app.request("GET", &format!("/api/events/{}", event_id), None, None).await;
    assert_eq!(before["event"], after["event"]);

    let booking = app.state.booking_repo.find_by_event_and_user(&event_id, &second.id).await.unwrap();
    assert!(booking.is_none());
    assert!(app.state.user_repo.registered_event_ids(&second.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_closed_and_missing_events() {
    let app = TestApp::new().await;
    let org = app.create_user("Organizer", "org@example.com").await;
    let guest = app.create_user("Guest", "guest@example.com").await;
    let event_id = app.create_event(&org, json!({ "status": "cancelled" })).await;

    let (status, body) = app.request("POST", &format!("/api/events/{}/register", event_id), Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Event is not open for registration");

    let (status, body) = app.request("POST", "/api/events/nope/register", Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found");

    let (status, _) = app.request("POST", &format!("/api/events/{}/register", event_id), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_confirmation_email_is_sent() {
    let app = TestApp::new().await;
    let org = app.create_user("Organizer", "org@example.com").await;
    let guest = app.create_user("Guest", "guest@example.com").await;
    let event_id = app.create_event(&org, json!({})).await;

    app.request("POST", &format!("/api/events/{}/register", event_id), Some(&guest.token), None).await;

    let sent = app.emails.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "guest@example.com");
    assert_eq!(sent[0].subject, "Registration confirmed: Rust Kathmandu Meetup");
    assert!(sent[0].html_body.contains("Guest"));
    assert!(sent[0].html_body.contains("Hub"));
}

#[tokio::test]
async fn test_email_failure_does_not_fail_registration() {
    let app = TestApp::new().await;
    app.emails.fail.store(true, Ordering::SeqCst);
    let org = app.create_user("Organizer", "org@example.com").await;
    let guest = app.create_user("Guest", "guest@example.com").await;
    let event_id = app.create_event(&org, json!({})).await;

    let (status, body) = app.request("POST", &format!("/api/events/{}/register", event_id), Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully registered for event");
    assert!(app.emails.sent().is_empty());
}

#[tokio::test]
async fn test_cancel_then_reregister_upserts_booking() {
    let app = TestApp::new().await;
    let org = app.create_user("Organizer", "org@example.com").await;
    let guest = app.create_user("Guest", "guest@example.com").await;
    let event_id = app.create_event(&org, json!({ "price": 200 })).await;
    let uri = format!("/api/events/{}/register", event_id);

    let (_, first) = app.request("POST", &uri, Some(&guest.token), None).await;
    let booking_id = first["booking"]["id"].as_str().unwrap().to_string();
    assert_eq!(first["booking"]["paymentStatus"], "pending");

    let (status, body) = app.request("DELETE", &uri, Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration cancelled successfully");
    assert_eq!(body["event"]["attendees"], json!([]));
    assert!(app.state.user_repo.registered_event_ids(&guest.id).await.unwrap().is_empty());

    // Cancellation leaves the booking as it was.
    let kept = app.state.booking_repo.find_by_event_and_user(&event_id, &guest.id).await.unwrap().unwrap();
    assert_eq!(kept.id, booking_id);

    let payment = json!({ "payment": { "method": "esewa", "reference": "REF-77", "status": "paid" } });
    let (status, second) = app.request("POST", &uri, Some(&guest.token), Some(payment)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["booking"]["id"], booking_id.as_str());
    assert_eq!(second["booking"]["paymentMethod"], "esewa");
    assert_eq!(second["booking"]["paymentReference"], "REF-77");
    assert_eq!(second["booking"]["createdAt"], first["booking"]["createdAt"]);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE event_id = ? AND user_id = ?")
        .bind(&event_id)
        .bind(&guest.id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_cancel_missing_event() {
    let app = TestApp::new().await;
    let guest = app.create_user("Guest", "guest@example.com").await;
    let (status, _) = app.request("DELETE", "/api/events/ghost/register", Some(&guest.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stalled_mail_relay_does_not_hold_registration() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let relay = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(30)))
        .mount(&relay)
        .await;

    let app = TestApp::with_mail_relay(&relay.uri(), std::time::Duration::from_millis(300)).await;
    let org = app.create_user("Organizer", "org@example.com").await;
    let guest = app.create_user("Guest", "guest@example.com").await;
    let event_id = app.create_event(&org, json!({})).await;

    let started = std::time::Instant::now();
    let (status, body) = tokio::time::timeout(
        std::time::Duration::from_secs(10),
        app.request("POST", &format!("/api/events/{}/register", event_id), Some(&guest.token), None),
    )
    .await
    .expect("registration should not wait on the relay");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully registered for event");
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}
