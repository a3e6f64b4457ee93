// src/handlers/health.rs

use axum::{Json, response::IntoResponse};
use serde_json::json;

/// Liveness probe; touches neither the database nor the completion API.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "API is working"
    }))
}
