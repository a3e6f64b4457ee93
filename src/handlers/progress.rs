// src/handlers/progress.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

use crate::{db::Database, error::AppError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub total_count: i64,
    pub updated_count: i64,
}

/// How many questions exist and how many have been revised.
pub async fn get_progress(State(db): State<Database>) -> Result<impl IntoResponse, AppError> {
    let mut conn = db.connect().await?;

    let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions_duplicated")
        .fetch_one(&mut conn)
        .await?;

    let updated_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM questions_duplicated WHERE already_updated = 1")
            .fetch_one(&mut conn)
            .await?;

    Ok(Json(Progress {
        total_count,
        updated_count,
    }))
}
