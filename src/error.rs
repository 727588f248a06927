use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::domain::models::payment::GatewayError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
        details: Value,
    },
    #[error("Not configured: {0}")]
    NotConfigured(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// Wraps a vendor failure. Rejections keep the vendor status unless
    /// `status` forces one (verification endpoints always answer 402).
    pub fn from_gateway(err: GatewayError, status: Option<StatusCode>, message: &str) -> Self {
        match err {
            GatewayError::NotConfigured(what) => AppError::NotConfigured(what),
            other => {
                let status = status
                    .or_else(|| other.status().and_then(|s| StatusCode::from_u16(s).ok()))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                AppError::Upstream {
                    status,
                    message: message.to_string(),
                    details: other.details(),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" })),
                        )
                            .into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "details": e.to_string() }),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" })),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Upstream { status, message, details } => {
                error!(status = status.as_u16(), "Gateway call failed: {} ({})", message, details);
                (status, json!({ "error": message, "details": details }))
            }
            AppError::NotConfigured(what) => {
                error!("Missing configuration: {}", what);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": format!("{} is not configured", what) }),
                )
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal error" })),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal error", "details": msg }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
