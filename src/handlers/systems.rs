// src/handlers/systems.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{db::Database, error::AppError, models::system::System};

/// Lists active systems ordered by topic name.
pub async fn list_systems(State(db): State<Database>) -> Result<impl IntoResponse, AppError> {
    let mut conn = db.connect().await?;

    let systems = sqlx::query_as::<_, System>(
        r#"
        SELECT CAST(id AS SIGNED) AS id, topic
        FROM system_lists
        WHERE is_active = 1
        ORDER BY topic ASC
        "#,
    )
    .fetch_all(&mut conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list systems: {:?}", e);
        AppError::from(e)
    })?;

    tracing::debug!(count = systems.len(), "Systems fetched");

    Ok(Json(systems))
}
