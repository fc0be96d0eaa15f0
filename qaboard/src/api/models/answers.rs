use crate::db::models::answers::AnswerWithAuthor;
use crate::types::{AnswerId, QuestionId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Request models
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AnswerCreate {
    pub question_id: Option<QuestionId>,
    pub user_id: Option<UserId>,
    pub answer_text: Option<String>,
}

// Response models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnswerResponse {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub user_id: UserId,
    pub answer_text: String,
    /// How many times this answer has been tipped
    pub tips_count: i32,
    /// Display name of the author
    pub username: String,
}

impl From<AnswerWithAuthor> for AnswerResponse {
    fn from(db: AnswerWithAuthor) -> Self {
        Self {
            id: db.id,
            question_id: db.question_id,
            user_id: db.user_id,
            answer_text: db.answer_text,
            tips_count: db.tips_count,
            username: db.username,
        }
    }
}
