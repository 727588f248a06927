//! Flat row shapes shared by the SQLite and Postgres repositories.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::{
    booking::{Booking, EventSnapshot, UserSnapshot},
    event::{Attendee, Event, Location},
    user::User,
};
use crate::error::AppError;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            password_hash: row.password_hash,
            role: row.role.parse().map_err(corrupt)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub organizer_id: String,
    pub capacity: i32,
    pub price: f64,
    pub image: String,
    pub status: String,
    pub tags_json: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRow {
    pub fn into_event(self, attendees: Vec<AttendeeRow>) -> Result<Event, AppError> {
        let tags: Vec<String> = serde_json::from_str(&self.tags_json)
            .map_err(|e| AppError::InternalWithMsg(format!("Corrupt tags for event {}: {}", self.id, e)))?;

        Ok(Event {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category.parse().map_err(corrupt)?,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            location: Location {
                venue: self.venue,
                address: self.address,
                city: self.city,
                state: self.state,
                zip_code: self.zip_code,
            },
            organizer: self.organizer_id,
            capacity: self.capacity,
            price: self.price,
            image: self.image,
            status: self.status.parse().map_err(corrupt)?,
            attendees: attendees.into_iter().map(Attendee::try_from).collect::<Result<_, _>>()?,
            tags,
            is_public: self.is_public,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Lowercased `%term%` with LIKE metacharacters escaped by `\`.
pub fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn tags_json(event: &Event) -> Result<String, AppError> {
    serde_json::to_string(&event.tags)
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to encode tags: {}", e)))
}

#[derive(Debug, Clone, FromRow)]
pub struct AttendeeRow {
    pub event_id: String,
    pub user_id: String,
    pub registered_at: DateTime<Utc>,
    pub status: String,
    pub payment_method: String,
    pub payment_reference: String,
    pub payment_status: String,
}

impl TryFrom<AttendeeRow> for Attendee {
    type Error = AppError;

    fn try_from(row: AttendeeRow) -> Result<Self, Self::Error> {
        Ok(Attendee {
            user: row.user_id,
            registered_at: row.registered_at,
            status: row.status.parse().map_err(corrupt)?,
            payment_method: row.payment_method.parse().map_err(corrupt)?,
            payment_reference: row.payment_reference,
            payment_status: row.payment_status.parse().map_err(corrupt)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct BookingRow {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub event_title: String,
    pub event_category: String,
    pub event_date: DateTime<Utc>,
    pub event_price: f64,
    pub user_name: String,
    pub user_email: String,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_reference: String,
    pub transaction_id: String,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            event: row.event_id,
            user: row.user_id,
            event_snapshot: EventSnapshot {
                title: row.event_title,
                category: row.event_category.parse().map_err(corrupt)?,
                date: row.event_date,
                price: row.event_price,
            },
            user_snapshot: UserSnapshot {
                name: row.user_name,
                email: row.user_email,
            },
            payment_method: row.payment_method.parse().map_err(corrupt)?,
            payment_status: row.payment_status.parse().map_err(corrupt)?,
            payment_reference: row.payment_reference,
            transaction_id: row.transaction_id,
            recorded_at: row.recorded_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Stored enum text that no longer parses is a server fault, not bad input.
fn corrupt(err: AppError) -> AppError {
    AppError::InternalWithMsg(format!("Corrupt stored value: {}", err))
}

/// Groups attendee rows by event while keeping their stored order.
pub fn group_attendees(rows: Vec<AttendeeRow>) -> std::collections::HashMap<String, Vec<AttendeeRow>> {
    let mut grouped: std::collections::HashMap<String, Vec<AttendeeRow>> = std::collections::HashMap::new();
    for row in rows {
        grouped.entry(row.event_id.clone()).or_default().push(row);
    }
    grouped
}

pub fn assemble_events(rows: Vec<EventRow>, attendees: Vec<AttendeeRow>) -> Result<Vec<Event>, AppError> {
    let grouped = group_attendees(attendees);
    rows.into_iter()
        .map(|row| {
            let attendees = grouped.get(&row.id).cloned().unwrap_or_default();
            row.into_event(attendees)
        })
        .collect()
}
