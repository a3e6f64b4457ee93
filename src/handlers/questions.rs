// src/handlers/questions.rs

use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::{
    db::{Database, normalize_flags, row_to_json},
    error::AppError,
    models::question::{
        AcceptRequest, ListParams, Question, QuestionRow, QuestionSummary, QuestionSummaryRow,
        UpdateQuestionRequest,
    },
    utils::extract::{ApiJson, ApiPath, ApiQuery},
};

/// Lists the questions of one system, one page at a time.
///
/// Questions reach a system through subtopic -> topic. Ordered by id; the
/// total is served separately by `/api/progress`.
pub async fn list_questions(
    State(db): State<Database>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let system_id = params
        .system_id
        .ok_or(AppError::BadRequest("systemId is required".to_string()))?;
    let (limit, offset) = params.window().map_err(AppError::BadRequest)?;

    let mut conn = db.connect().await?;

    let rows = sqlx::query_as::<_, QuestionSummaryRow>(
        r#"
        SELECT
            CAST(q.id AS SIGNED) AS id,
            CAST(q.already_updated AS SIGNED) AS already_updated,
            CAST(q.is_accepted AS SIGNED) AS is_accepted
        FROM questions_duplicated q
        JOIN subtopic_lists s ON q.subtopic_list_id = s.id
        JOIN topic_lists t ON s.topic_id = t.id
        WHERE t.system_id = ?
        ORDER BY q.id ASC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(system_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&mut conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        AppError::from(e)
    })?;

    let questions: Vec<QuestionSummary> = rows.into_iter().map(QuestionSummary::from).collect();

    Ok(Json(questions))
}

/// Retrieves a single question with its subtopic name.
pub async fn get_question(
    State(db): State<Database>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = db.connect().await?;

    let row = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT
            CAST(q.id AS SIGNED) AS id,
            CAST(q.subtopic_list_id AS SIGNED) AS subtopic_list_id,
            s.subtopic AS subtopic_list,
            q.scenario,
            q.image_url,
            q.question,
            q.option_a,
            q.option_b,
            q.option_c,
            q.option_d,
            q.option_e,
            q.correct_answer,
            q.discussion,
            q.learning_objective,
            CAST(q.already_updated AS SIGNED) AS already_updated,
            CAST(q.is_accepted AS SIGNED) AS is_accepted
        FROM questions_duplicated q
        LEFT JOIN subtopic_lists s ON q.subtopic_list_id = s.id
        WHERE q.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut conn)
    .await?
    .ok_or(AppError::question_not_found(id))?;

    Ok(Json(Question::from(row)))
}

/// Retrieves the snapshot row that precedes `id`, i.e. the largest id below it
/// in the legacy `questions` table.
pub async fn get_question_before(
    State(db): State<Database>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = db.connect().await?;

    let row = sqlx::query("SELECT * FROM questions WHERE id < ? ORDER BY id DESC LIMIT 1")
        .bind(id)
        .fetch_optional(&mut conn)
        .await?
        .ok_or(AppError::NotFound {
            error: "Question not found".to_string(),
            message: format!("No question found before ID {}", id),
        })?;

    let mut record = row_to_json(&row);
    normalize_flags(&mut record, &["already_updated", "is_accepted"]);

    Ok(Json(record))
}

/// Replaces the ten content fields of a question and marks it as updated.
///
/// The payload is validated before any database access.
pub async fn update_question(
    State(db): State<Database>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let content = payload
        .into_content()
        .map_err(|validation_errors| AppError::BadRequest(validation_errors.to_string()))?;

    let mut conn = db.connect().await?;

    let exists: Option<i64> =
        sqlx::query_scalar("SELECT CAST(id AS SIGNED) FROM questions_duplicated WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut conn)
            .await?;

    if exists.is_none() {
        return Err(AppError::question_not_found(id));
    }

    // TODO: copy the current row into questions_backup before overwriting it.
    sqlx::query(
        r#"
        UPDATE questions_duplicated SET
            scenario = ?,
            question = ?,
            option_a = ?,
            option_b = ?,
            option_c = ?,
            option_d = ?,
            option_e = ?,
            correct_answer = ?,
            discussion = ?,
            learning_objective = ?,
            already_updated = 1
        WHERE id = ?
        "#,
    )
    .bind(&content.scenario)
    .bind(&content.question)
    .bind(&content.option_a)
    .bind(&content.option_b)
    .bind(&content.option_c)
    .bind(&content.option_d)
    .bind(&content.option_e)
    .bind(&content.correct_answer)
    .bind(&content.discussion)
    .bind(&content.learning_objective)
    .bind(id)
    .execute(&mut conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update question {}: {:?}", id, e);
        AppError::from(e)
    })?;

    tracing::info!(question_id = id, "Question updated");

    Ok(Json(json!({ "success": true })))
}

/// Sets or clears the accepted flag.
pub async fn set_accepted(
    State(db): State<Database>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<AcceptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let is_accepted = payload
        .is_accepted
        .ok_or(AppError::BadRequest("is_accepted is required".to_string()))?;

    let mut conn = db.connect().await?;

    sqlx::query("UPDATE questions_duplicated SET is_accepted = ? WHERE id = ?")
        .bind(is_accepted)
        .bind(id)
        .execute(&mut conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to set is_accepted on question {}: {:?}", id, e);
            AppError::from(e)
        })?;

    tracing::info!(question_id = id, is_accepted, "Question acceptance changed");

    Ok(Json(json!({ "success": true })))
}

/// Dumps the legacy `questions` table as-is.
pub async fn list_raw_questions(
    State(db): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = db.connect().await?;

    let rows = sqlx::query("SELECT * FROM questions")
        .fetch_all(&mut conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read raw questions: {:?}", e);
            AppError::from(e)
        })?;

    let records: Vec<Value> = rows.iter().map(row_to_json).collect();

    Ok(Json(records))
}
