//! PostgreSQL store.
//!
//! Single-statement operations borrow a pooled connection; multi-statement operations open a
//! transaction and hand it to the repositories. A transaction that is dropped before `commit`
//! rolls back, so every early return through `?` leaves the database untouched.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use crate::db::errors::Result;
use crate::db::handlers::{Answers, Questions, Users};
use crate::db::models::{
    answers::{AnswerCreateDBRequest, AnswerWithAuthor},
    questions::{QuestionCreateDBRequest, QuestionDBResponse, QuestionWithAuthor},
    users::{UserCreateDBRequest, UserDBResponse},
};
use crate::ledger::{TipReceipt, TipTransfer};
use crate::types::{AnswerId, MacAddress, QuestionId, UserId};

use super::ForumStore;

/// PostgreSQL implementation of [`ForumStore`].
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ForumStore for PostgresStore {
    async fn find_user_by_address(&self, address: &MacAddress) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).get_user_by_mac_address(address).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).get_by_id(id).await
    }

    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).create(request).await
    }

    async fn adjust_points(&self, id: UserId, delta: i32) -> Result<i32> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).adjust_points(id, delta).await
    }

    #[instrument(skip(self, request), fields(user_id = request.user_id), err)]
    async fn create_question(&self, request: &QuestionCreateDBRequest, cost: i32) -> Result<QuestionDBResponse> {
        let mut tx = self.pool.begin().await?;

        let question = Questions::new(&mut tx).create(request).await?;
        Users::new(&mut tx).adjust_points(request.user_id, -cost).await?;

        tx.commit().await?;
        Ok(question)
    }

    async fn list_questions(&self) -> Result<Vec<QuestionWithAuthor>> {
        let mut conn = self.pool.acquire().await?;
        Questions::new(&mut conn).list_with_authors().await
    }

    async fn create_answer(&self, request: &AnswerCreateDBRequest) -> Result<AnswerWithAuthor> {
        let mut conn = self.pool.acquire().await?;
        Answers::new(&mut conn).create(request).await
    }

    async fn list_answers(&self, question_id: QuestionId) -> Result<Vec<AnswerWithAuthor>> {
        let mut conn = self.pool.acquire().await?;
        Answers::new(&mut conn).list_for_question(question_id).await
    }

    async fn increment_tip_count(&self, answer_id: AnswerId) -> Result<i32> {
        let mut conn = self.pool.acquire().await?;
        Answers::new(&mut conn).increment_tip_count(answer_id).await
    }

    #[instrument(skip(self, transfer), fields(source = transfer.source(), destination = transfer.destination(), answer_id = transfer.answer_id()), err)]
    async fn transfer_tip(&self, transfer: &TipTransfer) -> Result<TipReceipt> {
        let mut tx = self.pool.begin().await?;

        // Row locks are always taken in ascending user id order so two opposite tips
        // cannot deadlock each other.
        let mut source_points = 0;
        let mut destination_points = 0;
        {
            let mut users = Users::new(&mut tx);
            for (user_id, delta) in transfer.postings() {
                let balance = users.adjust_points(user_id, delta).await?;
                if user_id == transfer.source() {
                    source_points = balance;
                } else {
                    destination_points = balance;
                }
            }
        }

        let tips_count = Answers::new(&mut tx).increment_tip_count(transfer.answer_id()).await?;

        tx.commit().await?;

        Ok(TipReceipt {
            tips_count,
            source_points,
            destination_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;
    use crate::test_utils::seed_user;

    #[sqlx::test]
    async fn test_tipping_moves_points_and_counts(pool: PgPool) {
        contract::tipping_moves_points_and_counts(&PostgresStore::new(pool)).await;
    }

    #[sqlx::test]
    async fn test_failed_tip_changes_nothing(pool: PgPool) {
        contract::failed_tip_changes_nothing(&PostgresStore::new(pool)).await;
    }

    #[sqlx::test]
    async fn test_duplicate_registration_conflicts(pool: PgPool) {
        contract::duplicate_registration_conflicts(&PostgresStore::new(pool)).await;
    }

    #[sqlx::test]
    async fn test_question_for_unknown_author_writes_nothing(pool: PgPool) {
        contract::question_for_unknown_author_writes_nothing(&PostgresStore::new(pool)).await;
    }

    #[sqlx::test]
    async fn test_listing_order(pool: PgPool) {
        contract::listing_order(&PostgresStore::new(pool)).await;
    }

    #[sqlx::test]
    async fn test_adjusting_points_has_no_floor(pool: PgPool) {
        contract::adjusting_points_has_no_floor(&PostgresStore::new(pool)).await;
    }

    #[sqlx::test]
    async fn test_tip_counter_counts_up(pool: PgPool) {
        contract::tip_counter_counts_up(&PostgresStore::new(pool)).await;
    }

    #[sqlx::test]
    async fn test_overflowing_tip_changes_nothing(pool: PgPool) {
        contract::overflowing_tip_changes_nothing(&PostgresStore::new(pool)).await;
    }

    #[sqlx::test]
    async fn test_overflowing_question_writes_nothing(pool: PgPool) {
        contract::overflowing_question_writes_nothing(&PostgresStore::new(pool)).await;
    }

    #[sqlx::test]
    async fn test_opposite_concurrent_tips_do_not_deadlock(pool: PgPool) {
        let store = PostgresStore::new(pool);
        let alice = seed_user(&store, "aa:aa:aa:aa:aa:10", "alice").await;
        let bob = seed_user(&store, "bb:bb:bb:bb:bb:10", "bob").await;
        let question = store
            .create_question(
                &QuestionCreateDBRequest {
                    user_id: alice.id,
                    title: "Deadlocks".to_string(),
                    question_text: "How do I avoid them?".to_string(),
                },
                10,
            )
            .await
            .unwrap();
        let answer_id = store
            .create_answer(&AnswerCreateDBRequest {
                question_id: question.id,
                user_id: bob.id,
                answer_text: "Lock in a fixed order".to_string(),
            })
            .await
            .unwrap()
            .id;

        let tips = (0..10).map(|i| {
            let store = store.clone();
            let (source, destination) = if i % 2 == 0 { (alice.id, bob.id) } else { (bob.id, alice.id) };
            tokio::spawn(async move {
                let transfer = TipTransfer::new(source, destination, answer_id, 5).unwrap();
                store.transfer_tip(&transfer).await
            })
        });
        for result in futures::future::join_all(tips).await {
            result.unwrap().unwrap();
        }

        let alice_after = store.get_user(alice.id).await.unwrap().unwrap().points;
        let bob_after = store.get_user(bob.id).await.unwrap().unwrap().points;
        assert_eq!(alice_after + bob_after, 190);
        assert_eq!(store.list_answers(question.id).await.unwrap()[0].tips_count, 10);
    }
}
