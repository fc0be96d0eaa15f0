//! Database repository for answers.

use crate::types::{AnswerId, QuestionId};
use crate::db::{
    errors::{DbError, Result},
    models::answers::{AnswerCreateDBRequest, AnswerWithAuthor},
};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Answers<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Answers<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert an answer and return it joined with the author's name.
    #[instrument(skip(self, request), fields(question_id = request.question_id, user_id = request.user_id), err)]
    pub async fn create(&mut self, request: &AnswerCreateDBRequest) -> Result<AnswerWithAuthor> {
        let answer = sqlx::query_as::<_, AnswerWithAuthor>(
            r#"
            WITH inserted AS (
                INSERT INTO answers (question_id, user_id, answer_text)
                VALUES ($1, $2, $3)
                RETURNING id, question_id, user_id, answer_text, tips_count
            )
            SELECT i.id, i.question_id, i.user_id, i.answer_text, i.tips_count, u.username
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(request.question_id)
        .bind(request.user_id)
        .bind(&request.answer_text)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(answer)
    }

    /// Answers to one question in the order they were given. An unknown question yields an
    /// empty list.
    #[instrument(skip(self), err)]
    pub async fn list_for_question(&mut self, question_id: QuestionId) -> Result<Vec<AnswerWithAuthor>> {
        let answers = sqlx::query_as::<_, AnswerWithAuthor>(
            r#"
            SELECT a.id, a.question_id, a.user_id, a.answer_text, a.tips_count, u.username
            FROM answers a
            JOIN users u ON u.id = a.user_id
            WHERE a.question_id = $1
            ORDER BY a.id ASC
            "#,
        )
        .bind(question_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(answers)
    }

    /// Bump the tip counter and return its new value.
    #[instrument(skip(self), err)]
    pub async fn increment_tip_count(&mut self, id: AnswerId) -> Result<i32> {
        let tips_count = sqlx::query_scalar::<_, i32>("UPDATE answers SET tips_count = tips_count + 1 WHERE id = $1 RETURNING tips_count")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        tips_count.ok_or(DbError::not_found("answer"))
    }
}
