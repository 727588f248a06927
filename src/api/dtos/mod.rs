pub mod requests;
pub mod responses;

use axum::{extract::rejection::JsonRejection, Json};
use crate::error::AppError;

/// Malformed or mistyped bodies are client errors, reported as 400.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}
