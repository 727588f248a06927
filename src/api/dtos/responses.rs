use crate::domain::models::{booking::Booking, event::Event, user::UserSummary};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct EventResponse {
    pub message: String,
    pub event: Event,
}

#[derive(Serialize)]
pub struct EventListResponse {
    pub events: Vec<Event>,
}

#[derive(Serialize)]
pub struct EventDetailResponse {
    pub event: Event,
    pub organizer: Option<UserSummary>,
}

#[derive(Serialize)]
pub struct RegistrationResponse {
    pub message: String,
    pub booking: Booking,
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub booking: Option<Booking>,
}

#[derive(Serialize)]
pub struct KhaltiVerifyResponse {
    pub success: bool,
    pub reference: String,
    pub details: Value,
}

#[derive(Serialize)]
pub struct EsewaVerifyResponse {
    pub success: bool,
    pub reference: String,
    pub raw: String,
}

#[derive(Serialize)]
pub struct EsewaCheckoutPayload {
    pub amount: String,
    pub tax_amount: String,
    pub total_amount: String,
    pub transaction_uuid: String,
    pub product_code: String,
}

#[derive(Serialize)]
pub struct EsewaCheckoutResponse {
    pub signature: String,
    pub signed_field_names: &'static str,
    pub payload: EsewaCheckoutPayload,
}
