//! Database models for questions.

use crate::types::{QuestionId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for posting a question
#[derive(Debug, Clone)]
pub struct QuestionCreateDBRequest {
    pub user_id: UserId,
    pub title: String,
    pub question_text: String,
}

/// A question row as stored
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct QuestionDBResponse {
    pub id: QuestionId,
    pub user_id: UserId,
    pub title: String,
    pub question_text: String,
    pub published_date: DateTime<Utc>,
}

/// A question joined with its author's display name
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct QuestionWithAuthor {
    pub id: QuestionId,
    pub user_id: UserId,
    pub title: String,
    pub question_text: String,
    pub published_date: DateTime<Utc>,
    pub username: String,
}
