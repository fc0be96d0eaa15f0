//! Database repository for questions.

use crate::db::{
    errors::Result,
    models::questions::{QuestionCreateDBRequest, QuestionDBResponse, QuestionWithAuthor},
};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Questions<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Questions<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert a question. `published_date` is assigned by the database.
    #[instrument(skip(self, request), fields(user_id = request.user_id), err)]
    pub async fn create(&mut self, request: &QuestionCreateDBRequest) -> Result<QuestionDBResponse> {
        let question = sqlx::query_as::<_, QuestionDBResponse>(
            r#"
            INSERT INTO questions (user_id, title, question_text)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, question_text, published_date
            "#,
        )
        .bind(request.user_id)
        .bind(&request.title)
        .bind(&request.question_text)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(question)
    }

    /// Every question with its author's name, newest first.
    #[instrument(skip(self), err)]
    pub async fn list_with_authors(&mut self) -> Result<Vec<QuestionWithAuthor>> {
        let questions = sqlx::query_as::<_, QuestionWithAuthor>(
            r#"
            SELECT q.id, q.user_id, q.title, q.question_text, q.published_date, u.username
            FROM questions q
            JOIN users u ON u.id = q.user_id
            ORDER BY q.published_date DESC, q.id DESC
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(questions)
    }
}
