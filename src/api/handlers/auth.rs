use axum::{extract::{rejection::JsonRejection, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::{body, requests::{LoginRequest, RegisterUserRequest}};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{auth::AuthResponse, user::User};
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

const MIN_PASSWORD_LEN: usize = 6;

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = body(payload)?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    let email = payload.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters", MIN_PASSWORD_LEN
        )));
    }

    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("A user with this email already exists".into()));
    }

    let password_hash = state.auth_service.hash_password(&payload.password)?;
    let phone = payload.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
    let user = User::new(payload.name, email, phone, password_hash, payload.role.unwrap_or_default());
    let user = state.user_repo.create(&user).await?;

    let token = state.auth_service.issue_token(&user)?;
    info!("Registered user {} ({})", user.id, user.role);

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = body(payload)?;

    let user = state.user_repo.find_by_email(&payload.email).await?;
    let user = match user {
        Some(u) if state.auth_service.verify_password(&payload.password, &u.password_hash) => u,
        _ => {
            warn!("Failed login attempt for {}", payload.email);
            return Err(AppError::Unauthorized);
        }
    };

    let token = state.auth_service.issue_token(&user)?;
    Ok(Json(AuthResponse { token, user }))
}

pub async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(json!({ "user": user }))
}
