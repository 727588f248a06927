use axum::{extract::{rejection::JsonRejection, Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::{
    body,
    requests::{CreateEventRequest, EventListQuery, UpdateEventRequest},
    responses::{EventDetailResponse, EventListResponse, EventResponse, MessageResponse},
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{
    event::{Event, EventFilter, NewEventParams},
    user::UserSummary,
};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = EventFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        category: parse_filter(query.category)?,
        status: parse_filter(query.status)?,
    };

    let events = state.event_repo.list_public(&filter).await?;
    Ok(Json(EventListResponse { events }))
}

fn parse_filter<T: FromStr<Err = AppError>>(raw: Option<String>) -> Result<Option<T>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_event(&state, &id).await?;
    let organizer = state.user_repo.find_by_id(&event.organizer).await?
        .as_ref()
        .map(UserSummary::from);

    Ok(Json(EventDetailResponse { event, organizer }))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = body(payload)?;

    let event = Event::new(NewEventParams {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
        organizer: user.id.clone(),
        capacity: payload.capacity,
        price: payload.price,
        image: payload.image,
        status: payload.status,
        tags: payload.tags,
        is_public: payload.is_public.unwrap_or(true),
    });
    event.validate()?;

    let event = state.event_repo.create(&event).await?;
    state.user_repo.push_created_event(&user.id, &event.id).await?;

    info!("Event {} created by {}", event.id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(EventResponse { message: "Event created successfully".into(), event }),
    ))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = body(payload)?;
    let mut event = find_event(&state, &id).await?;

    if !event.is_organized_by(&user.id) {
        return Err(AppError::Forbidden("Not authorized to update this event".into()));
    }
    if event.has_attendees() && !payload.is_status_only() {
        return Err(AppError::Validation("Cannot modify an event that already has attendees".into()));
    }

    if let Some(title) = payload.title { event.title = title.trim().to_string(); }
    if let Some(description) = payload.description { event.description = description; }
    if let Some(category) = payload.category { event.category = category; }
    if let Some(date) = payload.date { event.date = date; }
    if let Some(start_time) = payload.start_time { event.start_time = start_time; }
    if let Some(end_time) = payload.end_time { event.end_time = end_time; }
    if let Some(location) = payload.location { event.location = location; }
    if let Some(capacity) = payload.capacity { event.capacity = capacity; }
    if let Some(price) = payload.price { event.price = price; }
    if let Some(image) = payload.image { event.image = image; }
    if let Some(status) = payload.status { event.status = status; }
    if let Some(tags) = payload.tags { event.tags = tags; }
    if let Some(is_public) = payload.is_public { event.is_public = is_public; }
    event.updated_at = Utc::now();

    event.validate()?;
    let event = state.event_repo.update(&event).await?;

    info!("Event {} updated by {}", event.id, user.id);
    Ok(Json(EventResponse { message: "Event updated successfully".into(), event }))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_event(&state, &id).await?;

    if !event.is_organized_by(&user.id) {
        return Err(AppError::Forbidden("Not authorized to delete this event".into()));
    }
    if event.has_attendees() {
        return Err(AppError::Validation("Cannot delete an event that already has attendees".into()));
    }

    state.event_repo.delete(&event.id).await?;

    info!("Event {} deleted by {}", event.id, user.id);
    Ok(Json(MessageResponse { message: "Event deleted successfully".into() }))
}

pub async fn list_created(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_by_organizer(&user.id).await?;
    Ok(Json(EventListResponse { events }))
}

pub async fn list_registered(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_registered(&user.id).await?;
    Ok(Json(EventListResponse { events }))
}

pub(crate) async fn find_event(state: &AppState, id: &str) -> Result<Event, AppError> {
    state.event_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Event not found".into()))
}
