// src/handlers/auth.rs

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    extract::{ConnectInfo, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::Config,
    error::AppError,
    utils::{extract::ApiJson, jwt::sign_jwt, login_guard::LoginAttempts},
};

/// DTO for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Authenticates the admin and returns a JWT token.
///
/// * Rejects with 429 while the client address is locked out, without
///   looking at the credentials.
/// * Compares email and password verbatim against the configured pair.
/// * A failure is counted against the client address; a success clears it.
pub async fn login(
    State(config): State<Config>,
    State(attempts): State<Arc<dyn LoginAttempts>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let address = addr.ip().to_string();

    if attempts.is_locked_out(&address) {
        tracing::warn!(%address, "Login rejected, address is locked out");
        return Err(AppError::TooManyAttempts);
    }

    if payload.email != config.admin_email || payload.password != config.admin_password {
        let attempts_left = attempts.record_failure(&address);
        tracing::warn!(%address, attempts_left, "Failed login attempt");
        return Err(AppError::AuthFailed { attempts_left });
    }

    attempts.reset(&address);

    let token = sign_jwt(&payload.email, &config.jwt_secret, config.jwt_expiration)?;
    tracing::info!(%address, "Admin logged in");

    Ok(Json(json!({ "token": token })))
}
