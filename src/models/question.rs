// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Letters a stored `correct_answer` may take.
pub const ANSWER_LETTERS: [&str; 5] = ["A", "B", "C", "D", "E"];

/// Row shape of the 'questions_duplicated' table joined with its subtopic.
/// Flag columns are nullable integers; see [`Question`] for the public shape.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub subtopic_list_id: Option<i64>,
    pub subtopic_list: Option<String>,
    pub scenario: Option<String>,
    pub image_url: Option<String>,
    pub question: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub option_e: Option<String>,
    pub correct_answer: Option<String>,
    pub discussion: Option<String>,
    pub learning_objective: Option<String>,
    pub already_updated: Option<i64>,
    pub is_accepted: Option<i64>,
}

/// Full question record as returned by `GET /api/questions/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: i64,
    pub subtopic_list_id: Option<i64>,
    /// Name of the subtopic the question belongs to.
    pub subtopic_list: Option<String>,
    pub scenario: Option<String>,
    pub image_url: Option<String>,
    pub question: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub option_e: Option<String>,
    pub correct_answer: Option<String>,
    pub discussion: Option<String>,
    pub learning_objective: Option<String>,
    pub already_updated: bool,
    pub is_accepted: bool,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            subtopic_list_id: row.subtopic_list_id,
            subtopic_list: row.subtopic_list,
            scenario: row.scenario,
            image_url: row.image_url,
            question: row.question,
            option_a: row.option_a,
            option_b: row.option_b,
            option_c: row.option_c,
            option_d: row.option_d,
            option_e: row.option_e,
            correct_answer: row.correct_answer,
            discussion: row.discussion,
            learning_objective: row.learning_objective,
            already_updated: flag(row.already_updated),
            is_accepted: flag(row.is_accepted),
        }
    }
}

/// Row shape for the paginated list.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionSummaryRow {
    pub id: i64,
    pub already_updated: Option<i64>,
    pub is_accepted: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionSummary {
    pub id: i64,
    pub already_updated: bool,
    pub is_accepted: bool,
}

impl From<QuestionSummaryRow> for QuestionSummary {
    fn from(row: QuestionSummaryRow) -> Self {
        Self {
            id: row.id,
            already_updated: flag(row.already_updated),
            is_accepted: flag(row.is_accepted),
        }
    }
}

fn flag(value: Option<i64>) -> bool {
    value.unwrap_or(0) != 0
}

/// The ten content fields shared by stored questions and generated drafts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionContent {
    pub scenario: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub option_e: String,
    pub correct_answer: String,
    pub discussion: String,
    pub learning_objective: String,
}

/// Nullable view of the content columns, read before building a prompt.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoredContent {
    pub scenario: Option<String>,
    pub question: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub option_e: Option<String>,
    pub correct_answer: Option<String>,
    pub discussion: Option<String>,
    pub learning_objective: Option<String>,
}

/// DTO for `PATCH /api/questions/{id}`.
///
/// Fields are optional so that a missing field is a 400 from validation
/// rather than a deserialization rejection.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(required, length(min = 1))]
    pub scenario: Option<String>,
    #[validate(required, length(min = 1))]
    pub question: Option<String>,
    #[validate(required, length(min = 1))]
    pub option_a: Option<String>,
    #[validate(required, length(min = 1))]
    pub option_b: Option<String>,
    #[validate(required, length(min = 1))]
    pub option_c: Option<String>,
    #[validate(required, length(min = 1))]
    pub option_d: Option<String>,
    #[validate(required, length(min = 1))]
    pub option_e: Option<String>,
    #[validate(required, custom(function = validate_answer_letter))]
    pub correct_answer: Option<String>,
    #[validate(required, length(min = 1))]
    pub discussion: Option<String>,
    #[validate(required, length(min = 1))]
    pub learning_objective: Option<String>,
}

fn validate_answer_letter(answer: &str) -> Result<(), validator::ValidationError> {
    if !ANSWER_LETTERS.contains(&answer) {
        return Err(validator::ValidationError::new("invalid_answer_letter")
            .with_message("correct_answer must be one of: A, B, C, D, E".into()));
    }
    Ok(())
}

impl UpdateQuestionRequest {
    /// Validates the payload and returns the ten fields ready to be written.
    pub fn into_content(self) -> Result<QuestionContent, validator::ValidationErrors> {
        self.validate()?;

        Ok(QuestionContent {
            scenario: self.scenario.unwrap_or_default(),
            question: self.question.unwrap_or_default(),
            option_a: self.option_a.unwrap_or_default(),
            option_b: self.option_b.unwrap_or_default(),
            option_c: self.option_c.unwrap_or_default(),
            option_d: self.option_d.unwrap_or_default(),
            option_e: self.option_e.unwrap_or_default(),
            correct_answer: self.correct_answer.unwrap_or_default(),
            discussion: self.discussion.unwrap_or_default(),
            learning_objective: self.learning_objective.unwrap_or_default(),
        })
    }
}

/// DTO for `PATCH /api/questions/{id}/accept`.
#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    pub is_accepted: Option<bool>,
}

/// Query parameters for `GET /api/questions`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(rename = "systemId")]
    pub system_id: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

impl ListParams {
    /// Resolves `(limit, offset)` for a 1-based page.
    pub fn window(&self) -> Result<(i64, i64), String> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if page < 1 {
            return Err("page must be at least 1".to_string());
        }
        if limit < 1 {
            return Err("limit must be at least 1".to_string());
        }
        let limit = limit.min(MAX_PAGE_SIZE);
        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| format!("page {} is out of range", page))?;
        Ok((limit, offset))
    }
}
