pub mod esewa_gateway;
pub mod khalti_gateway;

use crate::domain::models::payment::GatewayError;
use reqwest::Response;
use serde_json::Value;

/// Reads a vendor reply, turning non-2xx statuses into `Rejected` with the
/// body kept as JSON when it parses and as text otherwise.
pub(crate) async fn read_json(res: Response) -> Result<Value, GatewayError> {
    let status = res.status();
    let text = res.text().await.map_err(transport)?;
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

    if status.is_success() {
        Ok(body)
    } else {
        Err(GatewayError::Rejected { status: status.as_u16(), body })
    }
}

pub(crate) fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}
