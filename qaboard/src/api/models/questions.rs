use crate::db::models::questions::{QuestionDBResponse, QuestionWithAuthor};
use crate::types::{QuestionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display format for `published_date` in question listings, e.g. `May 21`
pub const PUBLISHED_DATE_FORMAT: &str = "%b %-d";

// Request models
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct QuestionCreate {
    /// Author of the question; pays the question cost
    pub user_id: Option<UserId>,
    pub title: Option<String>,
    pub question_text: Option<String>,
}

// Response models
/// A question as stored, returned right after posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionResponse {
    pub id: QuestionId,
    pub user_id: UserId,
    pub title: String,
    pub question_text: String,
    pub published_date: DateTime<Utc>,
}

/// A question in the listing, with its author's name and a short display date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionListItem {
    pub id: QuestionId,
    pub user_id: UserId,
    pub title: String,
    pub question_text: String,
    #[schema(example = "May 21")]
    pub published_date: String,
    pub username: String,
}

// Conversions
impl From<QuestionDBResponse> for QuestionResponse {
    fn from(db: QuestionDBResponse) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            question_text: db.question_text,
            published_date: db.published_date,
        }
    }
}

impl From<QuestionWithAuthor> for QuestionListItem {
    fn from(db: QuestionWithAuthor) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            question_text: db.question_text,
            published_date: db.published_date.format(PUBLISHED_DATE_FORMAT).to_string(),
            username: db.username,
        }
    }
}
