use std::env;
use std::time::Duration;

pub const DEFAULT_KHALTI_VERIFY_URL: &str = "https://khalti.com/api/v2/payment/verify/";
pub const DEFAULT_KHALTI_INITIATE_URL: &str = "https://dev.khalti.com/api/v2/epayment/initiate/";
pub const DEFAULT_KHALTI_LOOKUP_URL: &str = "https://dev.khalti.com/api/v2/epayment/lookup/";
pub const DEFAULT_ESEWA_VERIFY_URL: &str = "https://esewa.com.np/epay/transrec";
pub const DEFAULT_ESEWA_STATUS_URL: &str = "https://rc.esewa.com.np/api/epay/transaction/status/";

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub mail_from_alias: String,
    pub khalti_secret_key: Option<String>,
    pub khalti_verify_url: String,
    pub khalti_initiate_url: String,
    pub khalti_lookup_url: String,
    pub esewa_merchant_code: Option<String>,
    pub esewa_secret_key: Option<String>,
    pub esewa_verify_url: String,
    pub esewa_status_url: String,
    /// Upper bound for every call to the mail relay and payment gateways.
    pub outbound_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "5000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_default(),
            mail_from_alias: env::var("MAIL_FROM_ALIAS").unwrap_or_else(|_| "Event Registration".to_string()),
            khalti_secret_key: optional("KHALTI_SECRET_KEY"),
            khalti_verify_url: env::var("KHALTI_VERIFY_URL").unwrap_or_else(|_| DEFAULT_KHALTI_VERIFY_URL.to_string()),
            khalti_initiate_url: env::var("KHALTI_INITIATE_URL").unwrap_or_else(|_| DEFAULT_KHALTI_INITIATE_URL.to_string()),
            khalti_lookup_url: env::var("KHALTI_LOOKUP_URL").unwrap_or_else(|_| DEFAULT_KHALTI_LOOKUP_URL.to_string()),
            esewa_merchant_code: optional("ESEWA_MERCHANT_CODE"),
            esewa_secret_key: optional("ESEWA_SECRET_KEY"),
            esewa_verify_url: env::var("ESEWA_VERIFY_URL").unwrap_or_else(|_| DEFAULT_ESEWA_VERIFY_URL.to_string()),
            esewa_status_url: env::var("ESEWA_STATUS_URL").unwrap_or_else(|_| DEFAULT_ESEWA_STATUS_URL.to_string()),
            outbound_timeout: Duration::from_secs(
                env::var("OUTBOUND_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string()).parse().expect("OUTBOUND_TIMEOUT_SECS must be a number"),
            ),
        }
    }
}

/// Unset and blank variables both count as missing.
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
