use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::payment::{PaymentDetails, PaymentMethod, PaymentStatus};
use crate::error::AppError;

text_enum! {
    EventCategory ("category", default Other) {
        Conference => "conference",
        Workshop => "workshop",
        Seminar => "seminar",
        Meetup => "meetup",
        Webinar => "webinar",
        Wedding => "wedding",
        BirthdayParty => "birthday-party",
        CorporateEvent => "corporate-event",
        Networking => "networking",
        Charity => "charity",
        Fundraiser => "fundraiser",
        Concert => "concert",
        Festival => "festival",
        Exhibition => "exhibition",
        Sports => "sports",
        Hackathon => "hackathon",
        CollegeProgram => "college-program",
        Graduation => "graduation",
        Reunion => "reunion",
        ProductLaunch => "product-launch",
        Training => "training",
        AwardsCeremony => "awards-ceremony",
        Community => "community",
        Cultural => "cultural",
        Religious => "religious",
        Other => "other",
    }
}

text_enum! {
    EventStatus ("event status", default Upcoming) {
        Upcoming => "upcoming",
        Ongoing => "ongoing",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

text_enum! {
    AttendeeStatus ("attendee status", default Registered) {
        Registered => "registered",
        Attended => "attended",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub venue: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub user: String,
    pub registered_at: DateTime<Utc>,
    pub status: AttendeeStatus,
    pub payment_method: PaymentMethod,
    pub payment_reference: String,
    pub payment_status: PaymentStatus,
}

impl Attendee {
    pub fn new(user_id: &str, payment: &PaymentDetails) -> Self {
        Self {
            user: user_id.to_string(),
            registered_at: Utc::now(),
            status: AttendeeStatus::Registered,
            payment_method: payment.method,
            payment_reference: payment.reference.clone(),
            payment_status: payment.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub location: Location,
    pub organizer: String,
    pub capacity: i32,
    pub price: f64,
    pub image: String,
    pub status: EventStatus,
    pub attendees: Vec<Attendee>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub location: Location,
    pub organizer: String,
    pub capacity: i32,
    pub price: f64,
    pub image: String,
    pub status: EventStatus,
    pub tags: Vec<String>,
    pub is_public: bool,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title.trim().to_string(),
            description: params.description,
            category: params.category,
            date: params.date,
            start_time: params.start_time,
            end_time: params.end_time,
            location: params.location,
            organizer: params.organizer,
            capacity: params.capacity,
            price: params.price,
            image: params.image,
            status: params.status,
            attendees: Vec::new(),
            tags: params.tags,
            is_public: params.is_public,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_registered(&self, user_id: &str) -> bool {
        self.attendees.iter().any(|a| a.user == user_id)
    }

    pub fn is_full(&self) -> bool {
        self.attendees.len() >= self.capacity.max(0) as usize
    }

    pub fn has_attendees(&self) -> bool {
        !self.attendees.is_empty()
    }

    pub fn is_organized_by(&self, user_id: &str) -> bool {
        self.organizer == user_id
    }

    pub fn is_free(&self) -> bool {
        self.price <= 0.0
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EventFilter {
    pub search: Option<String>,
    pub category: Option<EventCategory>,
    pub status: Option<EventStatus>,
}

impl Event {
    /// Checks the fields a client can set on create or update.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("location.venue", &self.location.venue),
            ("location.address", &self.location.address),
        ];
        let missing: Vec<&str> = required.iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!("Missing required fields: {}", missing.join(", "))));
        }
        if self.capacity < 1 {
            return Err(AppError::Validation("Capacity must be at least 1".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::Validation("Price cannot be negative".into()));
        }
        for (name, value) in [("startTime", &self.start_time), ("endTime", &self.end_time)] {
            if !is_clock_time(value) {
                return Err(AppError::Validation(format!("{} must be in HH:MM format", name)));
            }
        }
        Ok(())
    }
}

/// `HH:MM`, 24-hour.
pub fn is_clock_time(value: &str) -> bool {
    let Some((h, m)) = value.split_once(':') else { return false };
    if h.len() != 2 || m.len() != 2 || !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!((h.parse::<u8>(), m.parse::<u8>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
}
