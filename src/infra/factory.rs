use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::domain::ports::{BookingRepository, EventRepository, UserRepository};
use crate::domain::services::notification_service::CONFIRMATION_TEMPLATE;
use crate::state::AppState;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::payments::{
    esewa_gateway::{EsewaUrls, HttpEsewaGateway},
    khalti_gateway::{HttpKhaltiGateway, KhaltiUrls},
};
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_event_repo::PostgresEventRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_user_repo::SqliteUserRepo,
};

type Repositories = (Arc<dyn UserRepository>, Arc<dyn EventRepository>, Arc<dyn BookingRepository>);

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template(CONFIRMATION_TEMPLATE, include_str!("../../templates/confirmation.html"))
        .expect("Failed to load confirmation template");
    tera
}

/// Shared client for outbound calls; a stalled peer fails after `timeout`.
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let http = http_client(config.outbound_timeout);

    let email_service = Arc::new(HttpEmailService::new(
        http.clone(),
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
        config.mail_from_alias.clone(),
    ));

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

    let (user_repo, event_repo, booking_repo) = connect_repositories(&config.database_url).await;

    AppState::assemble(
        config.clone(),
        user_repo,
        event_repo,
        booking_repo,
        email_service,
        khalti,
        esewa,
        Arc::new(load_templates()),
    )
}

async fn connect_repositories(database_url: &str) -> Repositories {
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        (
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresEventRepo::new(pool.clone())),
            Arc::new(PostgresBookingRepo::new(pool)),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        (
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteBookingRepo::new(pool)),
        )
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
