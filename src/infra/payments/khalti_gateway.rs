use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{read_json, transport};
use crate::domain::models::payment::GatewayError;
use crate::domain::ports::KhaltiGateway;

#[derive(Clone)]
pub struct KhaltiUrls {
    pub verify: String,
    pub initiate: String,
    pub lookup: String,
}

pub struct HttpKhaltiGateway {
    client: Client,
    secret_key: Option<String>,
    urls: KhaltiUrls,
}

impl HttpKhaltiGateway {
    pub fn new(client: Client, secret_key: Option<String>, urls: KhaltiUrls) -> Self {
        Self { client, secret_key, urls }
    }

    fn authorization(&self) -> Result<String, GatewayError> {
        self.secret_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|k| format!("Key {}", k))
            .ok_or_else(|| GatewayError::NotConfigured("Khalti secret key".into()))
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value, GatewayError> {
        let auth = self.authorization()?;
        debug!("POST {}", url);
        let res = self.client.post(url)
            .header("Authorization", auth)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        read_json(res).await.inspect_err(|e| warn!("Khalti call to {} failed: {}", url, e))
    }
}

#[async_trait]
impl KhaltiGateway for HttpKhaltiGateway {
    async fn verify(&self, token: &str, amount_paisa: i64) -> Result<Value, GatewayError> {
        self.post(&self.urls.verify, &json!({ "token": token, "amount": amount_paisa })).await
    }

    async fn initiate(&self, payload: &Value) -> Result<Value, GatewayError> {
        self.post(&self.urls.initiate, payload).await
    }

    async fn lookup(&self, pidx: &str) -> Result<Value, GatewayError> {
        self.post(&self.urls.lookup, &json!({ "pidx": pidx })).await
    }
}
