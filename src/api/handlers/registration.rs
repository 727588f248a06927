use axum::{extract::{Path, State}, response::IntoResponse, Json};
use axum::body::Bytes;
use crate::api::dtos::{
    requests::RegisterRequest,
    responses::{EventResponse, RegistrationResponse},
};
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn register_for_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    raw: Bytes,
) -> Result<impl IntoResponse, AppError> {
    // The body is optional; free events are usually registered with none.
    let request: RegisterRequest = if raw.iter().all(u8::is_ascii_whitespace) {
        RegisterRequest::default()
    } else {
        serde_json::from_slice(&raw)
            .map_err(|e| AppError::Validation(format!("Invalid registration body: {}", e)))?
    };

    let registration = state.registration_service.register(&id, &user, request.payment).await?;

    Ok(Json(RegistrationResponse {
        message: "Successfully registered for event".into(),
        booking: registration.booking,
    }))
}

pub async fn cancel_registration(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.registration_service.cancel(&id, &user).await?;
    Ok(Json(EventResponse { message: "Registration cancelled successfully".into(), event }))
}
