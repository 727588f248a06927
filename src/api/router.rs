use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, booking, event, health, payment, registration};
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))

        // Events
        .route("/api/events", get(event::list_events).post(event::create_event))
        .route("/api/events/user/created", get(event::list_created))
        .route("/api/events/user/registered", get(event::list_registered))
        .route("/api/events/{id}", get(event::get_event).put(event::update_event).delete(event::delete_event))
        .route("/api/events/{id}/register", post(registration::register_for_event).delete(registration::cancel_registration))

        // Bookings
        .route("/api/bookings", get(booking::get_booking))

        // Payments
        .route("/api/payments/khalti/verify", post(payment::khalti_verify))
        .route("/api/payments/khalti/initiate", post(payment::khalti_initiate))
        .route("/api/payments/khalti/lookup", post(payment::khalti_lookup))
        .route("/api/payments/esewa/verify", post(payment::esewa_verify))
        .route("/api/payments/esewa/checkout", post(payment::esewa_checkout))
        .route("/api/payments/esewa/status", post(payment::esewa_status))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
