use axum::{extract::{Query, State}, response::IntoResponse, Json};
use crate::api::dtos::{requests::BookingQuery, responses::BookingResponse};
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<BookingQuery>,
) -> Result<impl IntoResponse, AppError> {
    let event_id = query.event_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(AppError::Validation("eventId query parameter is required".into()))?;

    let booking = state.booking_repo.find_by_event_and_user(&event_id, &user.id).await?;
    Ok(Json(BookingResponse { booking }))
}
