use crate::domain::models::{
    booking::Booking,
    event::{Attendee, Event, EventFilter},
    payment::GatewayError,
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn push_created_event(&self, user_id: &str, event_id: &str) -> Result<(), AppError>;
    async fn push_registered_event(&self, user_id: &str, event_id: &str) -> Result<(), AppError>;
    async fn pull_registered_event(&self, user_id: &str, event_id: &str) -> Result<(), AppError>;
    /// Read side of the `user_created_events` mirror. Listings query `events.organizer_id` instead.
    async fn created_event_ids(&self, user_id: &str) -> Result<Vec<String>, AppError>;
    async fn registered_event_ids(&self, user_id: &str) -> Result<Vec<String>, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// Public events matching the filter, soonest first.
    async fn list_public(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError>;
    /// Events organized by the user, latest first.
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError>;
    /// Events on the user's registered list, in list order.
    async fn list_registered(&self, user_id: &str) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn add_attendee(&self, event_id: &str, attendee: &Attendee) -> Result<(), AppError>;
    /// Removes every attendee entry of the user and returns how many were dropped.
    async fn remove_attendee(&self, event_id: &str, user_id: &str) -> Result<u64, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking or overwrites the existing one for the same
    /// (event, user) pair, keeping its id and creation time.
    async fn upsert(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_event_and_user(&self, event_id: &str, user_id: &str) -> Result<Option<Booking>, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait KhaltiGateway: Send + Sync {
    async fn verify(&self, token: &str, amount_paisa: i64) -> Result<Value, GatewayError>;
    async fn initiate(&self, payload: &Value) -> Result<Value, GatewayError>;
    async fn lookup(&self, pidx: &str) -> Result<Value, GatewayError>;
}

pub struct EsewaVerification {
    pub pid: String,
    pub amount: f64,
    pub reference_id: String,
}

#[async_trait]
pub trait EsewaGateway: Send + Sync {
    /// Returns the raw transaction record body; callers decide success.
    async fn verify(&self, request: &EsewaVerification) -> Result<String, GatewayError>;
    async fn status(&self, product_code: &str, total_amount: &str, transaction_uuid: &str) -> Result<Value, GatewayError>;
    /// Signs a checkout form with the merchant secret.
    fn sign_checkout(&self, total_amount: &str, transaction_uuid: &str, product_code: &str) -> Result<String, GatewayError>;
}
