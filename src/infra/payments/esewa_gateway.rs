use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{read_json, transport};
use crate::domain::models::payment::GatewayError;
use crate::domain::ports::{EsewaGateway, EsewaVerification};
use crate::domain::services::esewa;

#[derive(Clone)]
pub struct EsewaUrls {
    pub verify: String,
    pub status: String,
}

pub struct HttpEsewaGateway {
    client: Client,
    merchant_code: Option<String>,
    secret_key: Option<String>,
    urls: EsewaUrls,
}

impl HttpEsewaGateway {
    pub fn new(client: Client, merchant_code: Option<String>, secret_key: Option<String>, urls: EsewaUrls) -> Self {
        Self { client, merchant_code, secret_key, urls }
    }

    fn merchant_code(&self) -> Result<&str, GatewayError> {
        configured(&self.merchant_code, "eSewa merchant code")
    }

    fn secret_key(&self) -> Result<&str, GatewayError> {
        configured(&self.secret_key, "eSewa secret key")
    }
}

fn configured<'a>(value: &'a Option<String>, what: &str) -> Result<&'a str, GatewayError> {
    value.as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| GatewayError::NotConfigured(what.to_string()))
}

#[async_trait]
impl EsewaGateway for HttpEsewaGateway {
    async fn verify(&self, request: &EsewaVerification) -> Result<String, GatewayError> {
        let scd = self.merchant_code()?;
        let amt = format!("{:.2}", request.amount);
        let form = [
            ("amt", amt.as_str()),
            ("rid", request.reference_id.as_str()),
            ("pid", request.pid.as_str()),
            ("scd", scd),
        ];

        debug!("POST {} for pid {}", self.urls.verify, request.pid);
        let res = self.client.post(&self.urls.verify)
            .form(&form)
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        let body = res.text().await.map_err(transport)?;
        if !status.is_success() {
            warn!("eSewa verification for {} answered {}", request.pid, status);
            return Err(GatewayError::Rejected { status: status.as_u16(), body: Value::String(body) });
        }
        Ok(body)
    }

    async fn status(&self, product_code: &str, total_amount: &str, transaction_uuid: &str) -> Result<Value, GatewayError> {
        let res = self.client.get(&self.urls.status)
            .query(&[
                ("product_code", product_code),
                ("total_amount", total_amount),
                ("transaction_uuid", transaction_uuid),
            ])
            .send()
            .await
            .map_err(transport)?;

        read_json(res).await.inspect_err(|e| warn!("eSewa status check for {} failed: {}", transaction_uuid, e))
    }

    fn sign_checkout(&self, total_amount: &str, transaction_uuid: &str, product_code: &str) -> Result<String, GatewayError> {
        let secret = self.secret_key()?;
        esewa::sign(secret, total_amount, transaction_uuid, product_code)
            .ok_or_else(|| GatewayError::Transport("Unable to initialise HMAC".into()))
    }
}
