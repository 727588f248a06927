use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::AppError;

text_enum! {
    PaymentMethod ("payment method", default None) {
        Khalti => "khalti",
        Esewa => "esewa",
        Free => "free",
        None => "none",
        Pending => "pending",
    }
}

text_enum! {
    PaymentStatus ("payment status", default Pending) {
        Pending => "pending",
        Paid => "paid",
        Cancelled => "cancelled",
    }
}

/// Payment metadata as sent by the client after a gateway round trip.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub method: Option<String>,
    pub reference: Option<String>,
    pub transaction_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub reference: String,
    pub transaction_id: String,
}

impl PaymentDetails {
    /// Fills in whatever the caller left out: free events default to
    /// `free/paid`, priced events to `none/pending`.
    pub fn resolve(input: Option<PaymentInput>, price: f64) -> Result<Self, AppError> {
        let input = input.unwrap_or_default();
        let free = price <= 0.0;

        let method = match non_empty(input.method) {
            Some(raw) => raw.parse::<PaymentMethod>()?,
            None if free => PaymentMethod::Free,
            None => PaymentMethod::None,
        };
        if method == PaymentMethod::Pending {
            return Err(AppError::Validation("Invalid payment method 'pending'".into()));
        }

        let status = match non_empty(input.status) {
            Some(raw) => raw.parse::<PaymentStatus>()?,
            None if free => PaymentStatus::Paid,
            None => PaymentStatus::Pending,
        };

        Ok(Self {
            method,
            status,
            reference: input.reference.unwrap_or_default(),
            transaction_id: input.transaction_id.unwrap_or_default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Failure of an outbound call to Khalti or eSewa.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0} is not configured")]
    NotConfigured(String),
    #[error("gateway rejected the request with status {status}")]
    Rejected { status: u16, body: Value },
    #[error("gateway request failed: {0}")]
    Transport(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn details(&self) -> Value {
        match self {
            GatewayError::Rejected { body, .. } => body.clone(),
            GatewayError::Transport(msg) => Value::String(msg.clone()),
            GatewayError::NotConfigured(what) => Value::String(format!("{} is not configured", what)),
        }
    }
}

/// Converts rupees to paisa the way both gateways expect.
pub fn to_paisa(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}
