use crate::domain::models::{
    event::{EventCategory, EventStatus, Location},
    payment::PaymentInput,
    user::UserRole,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: EventCategory,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub location: Location,
    pub capacity: i32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_public: Option<bool>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<EventCategory>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<Location>,
    pub capacity: Option<i32>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub status: Option<EventStatus>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

impl UpdateEventRequest {
    /// True when the request only moves the event through its lifecycle.
    pub fn is_status_only(&self) -> bool {
        self.status.is_some()
            && self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.location.is_none()
            && self.capacity.is_none()
            && self.price.is_none()
            && self.image.is_none()
            && self.tags.is_none()
            && self.is_public.is_none()
    }
}

/// Raw list filters; `all` and blank values mean "no filter".
#[derive(Deserialize, Default)]
pub struct EventListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct RegisterRequest {
    pub payment: Option<PaymentInput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    pub event_id: Option<String>,
}

/// A JSON number or string, as gateway forms send either.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum FlexibleAmount {
    Number(f64),
    Text(String),
}

impl FlexibleAmount {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FlexibleAmount::Number(n) => Some(*n),
            FlexibleAmount::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Renders the value the way it goes into signed eSewa fields.
    pub fn as_text(&self) -> String {
        match self {
            FlexibleAmount::Number(n) => n.to_string(),
            FlexibleAmount::Text(s) => s.trim().to_string(),
        }
    }

    /// Blank text and a numeric zero both count as not supplied.
    pub fn is_absent(&self) -> bool {
        match self {
            FlexibleAmount::Number(n) => *n == 0.0,
            FlexibleAmount::Text(s) => s.trim().is_empty(),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct KhaltiVerifyRequest {
    pub token: Option<String>,
    pub amount: Option<FlexibleAmount>,
}

#[derive(Deserialize, Default)]
pub struct KhaltiInitiateRequest {
    pub amount: Option<FlexibleAmount>,
    pub purchase_order_id: Option<String>,
    pub purchase_order_name: Option<String>,
    pub return_url: Option<String>,
    pub website_url: Option<String>,
    pub failure_url: Option<String>,
    pub customer_info: Option<Value>,
    pub amount_breakdown: Option<Value>,
    pub product_details: Option<Value>,
    pub merchant_username: Option<String>,
    pub merchant_extra: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct KhaltiLookupRequest {
    pub pidx: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct EsewaVerifyRequest {
    pub pid: Option<String>,
    pub amt: Option<FlexibleAmount>,
    #[serde(rename = "refId")]
    pub ref_id: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct EsewaCheckoutRequest {
    pub pid: Option<String>,
    pub amount: Option<FlexibleAmount>,
    pub tax_amount: Option<FlexibleAmount>,
    pub total_amount: Option<FlexibleAmount>,
    pub product_code: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct EsewaStatusRequest {
    pub product_code: Option<String>,
    pub total_amount: Option<FlexibleAmount>,
    pub transaction_uuid: Option<String>,
}
