// src/handlers/regenerate.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::Connection;

use crate::{
    db::Database,
    error::AppError,
    llm::{ChatCompletion, envelope::extract, prompt},
    models::question::{ANSWER_LETTERS, QuestionContent, StoredContent},
    utils::extract::ApiPath,
};

#[derive(Debug, Deserialize)]
struct DiscussionDraft {
    discussion: String,
}

/// Reads the content columns of one question, closing the connection before
/// returning so it is not held open during the completion call.
async fn load_content(db: &Database, id: i64) -> Result<StoredContent, AppError> {
    let mut conn = db.connect().await?;

    let content = sqlx::query_as::<_, StoredContent>(
        r#"
        SELECT
            scenario, question,
            option_a, option_b, option_c, option_d, option_e,
            correct_answer, discussion, learning_objective
        FROM questions_duplicated
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut conn)
    .await?
    .ok_or(AppError::question_not_found(id))?;

    conn.close().await?;

    Ok(content)
}

/// Asks the language model for a new question testing the same concept as
/// question `id`, with a different scenario. The draft is returned, not stored.
pub async fn generate_question(
    State(db): State<Database>,
    State(completion): State<Arc<dyn ChatCompletion>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let original = load_content(&db, id).await?;

    let payload = completion.complete(&prompt::variant_messages(&original)).await?;
    let draft: QuestionContent = extract(&payload, prompt::DRAFT_KEYS)?;

    if !ANSWER_LETTERS.contains(&draft.correct_answer.as_str()) {
        tracing::warn!(
            question_id = id,
            correct_answer = %draft.correct_answer,
            "Generated draft has an invalid answer letter"
        );
    }

    tracing::info!(question_id = id, "Question variant generated");

    Ok(Json(json!({ "result": draft })))
}

/// Rewrites the discussion of question `id` and stores it, marking the
/// question as updated. Other fields are left untouched.
pub async fn update_discussion(
    State(db): State<Database>,
    State(completion): State<Arc<dyn ChatCompletion>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let original = load_content(&db, id).await?;

    let payload = completion
        .complete(&prompt::discussion_messages(&original))
        .await?;
    let draft: DiscussionDraft = extract(&payload, prompt::DISCUSSION_KEYS)?;

    if draft.discussion.trim().is_empty() {
        return Err(AppError::Upstream {
            error: "Failed to parse completion content".to_string(),
            message: "Completion returned an empty discussion".to_string(),
            raw: Some(payload),
        });
    }

    let mut conn = db.connect().await?;

    let result = sqlx::query(
        "UPDATE questions_duplicated SET discussion = ?, already_updated = 1 WHERE id = ?",
    )
    .bind(&draft.discussion)
    .bind(id)
    .execute(&mut conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to store discussion for question {}: {:?}", id, e);
        AppError::from(e)
    })?;

    // MySQL may report 0 for a row that matched but did not change.
    if result.rows_affected() == 0 {
        let still_there: Option<i64> =
            sqlx::query_scalar("SELECT CAST(id AS SIGNED) FROM questions_duplicated WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut conn)
                .await?;
        if still_there.is_none() {
            tracing::warn!(question_id = id, "Question vanished during discussion rewrite");
            return Err(AppError::question_not_found(id));
        }
    }

    tracing::info!(question_id = id, "Discussion regenerated");

    Ok(Json(json!({
        "success": true,
        "discussion": draft.discussion,
    })))
}
