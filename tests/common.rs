#![allow(dead_code)]

use event_registration_backend::{
    api::router::create_router,
    config::Config,
    domain::{
        models::user::{User, UserRole},
        ports::EmailService,
    },
    error::AppError,
    infra::{
        email::http_email_service::HttpEmailService,
        factory::{http_client, load_templates},
        payments::{
            esewa_gateway::{EsewaUrls, HttpEsewaGateway},
            khalti_gateway::{HttpKhaltiGateway, KhaltiUrls},
        },
        repositories::{
            sqlite_booking_repo::SqliteBookingRepo,
            sqlite_event_repo::SqliteEventRepo,
            sqlite_user_repo::SqliteUserRepo,
        },
    },
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tower::ServiceExt;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

/// Keeps every message instead of sending it; can be switched to fail.
#[derive(Default)]
pub struct RecordingEmailService {
    pub sent: Mutex<Vec<SentEmail>>,
    pub fail: AtomicBool,
}

impl RecordingEmailService {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("mail relay unavailable".into()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

pub struct TestUser {
    pub id: String,
    pub token: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub emails: Arc<RecordingEmailService>,
}

pub fn test_config(db_url: &str, gateway_base: &str) -> Config {
    Config {
        database_url: db_url.to_string(),
        port: 0,
        jwt_secret: "test-jwt-secret".to_string(),
        mail_service_url: "http://localhost".to_string(),
        mail_service_token: "token".to_string(),
        mail_from_alias: "Events".to_string(),
        khalti_secret_key: Some("test_khalti_secret".to_string()),
        khalti_verify_url: format!("{}/khalti/verify/", gateway_base),
        khalti_initiate_url: format!("{}/khalti/initiate/", gateway_base),
        khalti_lookup_url: format!("{}/khalti/lookup/", gateway_base),
        esewa_merchant_code: Some("EPAYTEST".to_string()),
        esewa_secret_key: Some("8gBm/:&EnhH.1/q".to_string()),
        esewa_verify_url: format!("{}/esewa/transrec", gateway_base),
        esewa_status_url: format!("{}/esewa/status/", gateway_base),
        outbound_timeout: std::time::Duration::from_secs(5),
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Gateways point at `gateway_base`, usually a wiremock server.
    pub async fn with_gateways(gateway_base: &str) -> Self {
        let base = gateway_base.to_string();
        Self::with_config(move |cfg| {
            let fresh = test_config(&cfg.database_url, &base);
            *cfg = fresh;
        }).await
    }

    pub async fn with_config(tweak: impl FnOnce(&mut Config)) -> Self {
        Self::build(tweak, None).await
    }

    /// Sends confirmations through the real HTTP relay adapter at `relay_url`.
    pub async fn with_mail_relay(relay_url: &str, timeout: std::time::Duration) -> Self {
        let relay = HttpEmailService::new(http_client(timeout), relay_url.to_string(), "relay-token".into(), "Events".into());
        Self::build(|_| {}, Some(Arc::new(relay))).await
    }

    async fn build(tweak: impl FnOnce(&mut Config), email: Option<Arc<dyn EmailService>>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut config = test_config(&db_url, "http://127.0.0.1:9");
        tweak(&mut config);

        let http = http_client(config.outbound_timeout);
        let khalti = Arc::new(HttpKhaltiGateway::new(
            http.clone(),
            config.khalti_secret_key.clone(),
            KhaltiUrls {
                verify: config.khalti_verify_url.clone(),
                initiate: config.khalti_initiate_url.clone(),
                lookup: config.khalti_lookup_url.clone(),
            },
        ));
        let esewa = Arc::new(HttpEsewaGateway::new(
            http,
            config.esewa_merchant_code.clone(),
            config.esewa_secret_key.clone(),
            EsewaUrls {
                verify: config.esewa_verify_url.clone(),
                status: config.esewa_status_url.clone(),
            },
        ));

        let emails = Arc::new(RecordingEmailService::default());

        let state = Arc::new(AppState::assemble(
            config,
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteBookingRepo::new(pool.clone())),
            email.unwrap_or_else(|| emails.clone() as Arc<dyn EmailService>),
            khalti,
            esewa,
            Arc::new(load_templates()),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            emails,
        }
    }

    /// Inserts a user directly and signs a token for it, skipping password hashing.
    pub async fn create_user(&self, name: &str, email: &str) -> TestUser {
        let user = User::new(name.into(), email.into(), None, "unused".into(), UserRole::Organizer);
        let user = self.state.user_repo.create(&user).await.unwrap();
        let token = self.state.auth_service.issue_token(&user).unwrap();
        TestUser { id: user.id, token }
    }

    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Creates a public upcoming event owned by `organizer`; `overrides` are
    /// merged into the default payload.
    pub async fn create_event(&self, organizer: &TestUser, overrides: Value) -> String {
        let mut payload = event_payload();
        if let (Some(base), Some(extra)) = (payload.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        let (status, body) = self.request("POST", "/api/events", Some(&organizer.token), Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "event creation failed: {}", body);
        body["event"]["id"].as_str().unwrap().to_string()
    }
}

pub fn event_payload() -> Value {
    json!({
        "title": "Rust Kathmandu Meetup",
        "description": "Talks and pizza",
        "category": "meetup",
        "date": (Utc::now() + Duration::days(14)).to_rfc3339(),
        "startTime": "18:00",
        "endTime": "20:30",
        "location": { "venue": "Hub", "address": "Thamel", "city": "Kathmandu" },
        "capacity": 10,
        "price": 0,
        "tags": ["rust", "community"]
    })
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
