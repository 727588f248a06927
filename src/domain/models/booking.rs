use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::event::{Event, EventCategory};
use super::payment::{PaymentDetails, PaymentMethod, PaymentStatus};
use super::user::User;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub title: String,
    pub category: EventCategory,
    pub date: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub name: String,
    pub email: String,
}

/// Denormalized record of one user's registration for one event. There is at
/// most one per (event, user); later registrations overwrite it.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub event: String,
    pub user: String,
    pub event_snapshot: EventSnapshot,
    pub user_snapshot: UserSnapshot,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_reference: String,
    pub transaction_id: String,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn snapshot(event: &Event, user: &User, payment: &PaymentDetails) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event: event.id.clone(),
            user: user.id.clone(),
            event_snapshot: EventSnapshot {
                title: event.title.clone(),
                category: event.category,
                date: event.date,
                price: event.price,
            },
            user_snapshot: UserSnapshot {
                name: user.name.clone(),
                email: user.email.clone(),
            },
            payment_method: payment.method,
            payment_status: payment.status,
            payment_reference: payment.reference.clone(),
            transaction_id: payment.transaction_id.clone(),
            recorded_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}
