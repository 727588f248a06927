//! eSewa ePay v2 signing and the legacy `transrec` response check.

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use regex::Regex;
use sha2::Sha256;
use std::sync::LazyLock;

pub const SIGNED_FIELD_NAMES: &str = "total_amount,transaction_uuid,product_code";

pub fn signature_message(total_amount: &str, transaction_uuid: &str, product_code: &str) -> String {
    format!(
        "total_amount={},transaction_uuid={},product_code={}",
        total_amount, transaction_uuid, product_code
    )
}

/// Base64 HMAC-SHA256 of the signed fields, keyed with the merchant secret.
pub fn sign(secret: &str, total_amount: &str, transaction_uuid: &str, product_code: &str) -> Option<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(signature_message(total_amount, transaction_uuid, product_code).as_bytes());
    Some(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// `<status>` element of the legacy `transrec` reply, tolerant of spacing and case.
static STATUS_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*status\s*>([^<]+)<\s*/status\s*>").expect("status pattern is valid")
});

/// True when the XML body carries a `<status>` element mentioning success.
pub fn transaction_succeeded(body: &str) -> bool {
    STATUS_ELEMENT
        .captures(body)
        .and_then(|caps| caps.get(1))
        .is_some_and(|status| status.as_str().to_ascii_lowercase().contains("success"))
}
