//! Database models for answers.

use crate::types::{AnswerId, QuestionId, UserId};
use sqlx::FromRow;

/// Database request for answering a question
#[derive(Debug, Clone)]
pub struct AnswerCreateDBRequest {
    pub question_id: QuestionId,
    pub user_id: UserId,
    pub answer_text: String,
}

/// An answer joined with its author's display name
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AnswerWithAuthor {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub user_id: UserId,
    pub answer_text: String,
    pub tips_count: i32,
    pub username: String,
}
