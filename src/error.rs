// src/error.rs

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
///
/// Every variant renders as a JSON body with at least `error` and `message`,
/// so the frontend can show the text as-is.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error (database failures, unexpected states)
    InternalServerError(String),

    // 500 carrying diagnostics from the completion API
    Upstream {
        error: String,
        message: String,
        raw: Option<Value>,
    },

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized, failed credential check
    AuthFailed { attempts_left: u32 },

    // 401 Unauthorized, missing or bad bearer token
    Unauthorized(String),

    // 404 Not Found
    NotFound { error: String, message: String },

    // 429 Too Many Requests (login lockout)
    TooManyAttempts,
}

impl AppError {
    /// The 404 used by every question lookup.
    pub fn question_not_found(id: i64) -> Self {
        AppError::NotFound {
            error: "Question not found".to_string(),
            message: format!("No question found with ID {}", id),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InternalServerError(_) | AppError::Upstream { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AuthFailed { .. } | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InternalServerError(msg) => write!(f, "internal error: {}", msg),
            AppError::Upstream { error, message, .. } => write!(f, "{}: {}", error, message),
            AppError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            AppError::AuthFailed { attempts_left } => {
                write!(f, "authentication failed ({} attempts left)", attempts_left)
            }
            AppError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            AppError::NotFound { message, .. } => write!(f, "not found: {}", message),
            AppError::TooManyAttempts => write!(f, "too many login attempts"),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                json!({
                    "error": "Internal Server Error",
                    "message": msg,
                })
            }
            AppError::Upstream {
                error,
                message,
                raw,
            } => {
                tracing::error!(%error, %message, "Completion API failure");
                let mut body = json!({
                    "error": error,
                    "message": message,
                });
                if let Some(raw) = raw {
                    body["raw"] = raw;
                }
                body
            }
            AppError::BadRequest(msg) => json!({
                "error": "Validation Error",
                "message": msg,
            }),
            AppError::AuthFailed { attempts_left } => json!({
                "error": "Authentication failed",
                "message": "Invalid email or password",
                "attemptsLeft": attempts_left,
            }),
            AppError::Unauthorized(msg) => json!({
                "error": "Unauthorized",
                "message": msg,
            }),
            AppError::NotFound { error, message } => json!({
                "error": error,
                "message": message,
            }),
            AppError::TooManyAttempts => json!({
                "error": "Too many login attempts",
                "message": "Please try again after 24 hours",
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

/// Malformed or wrongly typed JSON bodies are validation errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Transport-level failures talking to the completion API.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream {
            error: "Upstream API error".to_string(),
            message: err.to_string(),
            raw: None,
        }
    }
}
