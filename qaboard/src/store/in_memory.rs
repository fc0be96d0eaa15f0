//! In-memory store.
//!
//! All tables live behind one `RwLock`. Every write operation checks its preconditions, including
//! `i32` overflow of balances and counters, and then mutates while still holding the write guard.
//! A failure never leaves partial state and concurrent tips serialise on the lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::db::errors::{DbError, Result};
use crate::db::models::{
    answers::{AnswerCreateDBRequest, AnswerWithAuthor},
    questions::{QuestionCreateDBRequest, QuestionDBResponse, QuestionWithAuthor},
    users::{UserCreateDBRequest, UserDBResponse},
};
use crate::ledger::{TipReceipt, TipTransfer};
use crate::types::{AnswerId, MacAddress, QuestionId, UserId};

use super::ForumStore;

#[derive(Debug, Clone)]
struct StoredAnswer {
    id: AnswerId,
    question_id: QuestionId,
    user_id: UserId,
    answer_text: String,
    tips_count: i32,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, UserDBResponse>,
    users_by_address: HashMap<MacAddress, UserId>,
    questions: BTreeMap<QuestionId, QuestionDBResponse>,
    answers: BTreeMap<AnswerId, StoredAnswer>,
    next_user_id: UserId,
    next_question_id: QuestionId,
    next_answer_id: AnswerId,
}

impl Tables {
    fn next_id(counter: &mut i32) -> i32 {
        *counter += 1;
        *counter
    }

    fn username(&self, user_id: UserId) -> String {
        self.users.get(&user_id).map(|u| u.username.clone()).unwrap_or_default()
    }

    fn with_author(&self, answer: &StoredAnswer) -> AnswerWithAuthor {
        AnswerWithAuthor {
            id: answer.id,
            question_id: answer.question_id,
            user_id: answer.user_id,
            answer_text: answer.answer_text.clone(),
            tips_count: answer.tips_count,
            username: self.username(answer.user_id),
        }
    }

    /// The balance `id` would have after adding `delta`, without applying it.
    fn balance_after(&self, id: UserId, delta: i32) -> Result<i32> {
        let user = self.users.get(&id).ok_or(DbError::not_found("user"))?;
        checked(user.points, delta)
    }

    fn set_points(&mut self, id: UserId, points: i32) {
        if let Some(user) = self.users.get_mut(&id) {
            user.points = points;
        }
    }

    fn tips_after_increment(&self, answer_id: AnswerId) -> Result<i32> {
        let answer = self.answers.get(&answer_id).ok_or(DbError::not_found("answer"))?;
        checked(answer.tips_count, 1)
    }
}

/// `value + delta`, failing the way PostgreSQL reports an `integer` overflow.
fn checked(value: i32, delta: i32) -> Result<i32> {
    value
        .checked_add(delta)
        .ok_or_else(|| DbError::Other(anyhow::anyhow!("integer out of range")))
}

fn missing_reference(table: &str, constraint: &str) -> DbError {
    DbError::ForeignKeyViolation {
        constraint: Some(constraint.to_string()),
        table: Some(table.to_string()),
        message: format!("insert or update on table \"{table}\" violates foreign key constraint \"{constraint}\""),
    }
}

/// In-memory implementation of [`ForumStore`].
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ForumStore for InMemoryStore {
    async fn find_user_by_address(&self, address: &MacAddress) -> Result<Option<UserDBResponse>> {
        let tables = self.tables.read();
        Ok(tables
            .users_by_address
            .get(address)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut tables = self.tables.write();

        if tables.users_by_address.contains_key(&request.mac_address) {
            return Err(DbError::UniqueViolation {
                constraint: Some("users_mac_address_key".to_string()),
                table: Some("users".to_string()),
                message: "duplicate key value violates unique constraint \"users_mac_address_key\"".to_string(),
            });
        }

        let id = Tables::next_id(&mut tables.next_user_id);
        let user = UserDBResponse {
            id,
            mac_address: request.mac_address.clone(),
            username: request.username.clone(),
            points: request.points,
        };
        tables.users_by_address.insert(request.mac_address.clone(), id);
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn adjust_points(&self, id: UserId, delta: i32) -> Result<i32> {
        let mut tables = self.tables.write();
        let points = tables.balance_after(id, delta)?;
        tables.set_points(id, points);
        Ok(points)
    }

    async fn create_question(&self, request: &QuestionCreateDBRequest, cost: i32) -> Result<QuestionDBResponse> {
        let mut tables = self.tables.write();

        if !tables.users.contains_key(&request.user_id) {
            return Err(missing_reference("questions", "questions_user_id_fkey"));
        }
        let author_points = tables.balance_after(request.user_id, -cost)?;

        let id = Tables::next_id(&mut tables.next_question_id);
        let question = QuestionDBResponse {
            id,
            user_id: request.user_id,
            title: request.title.clone(),
            question_text: request.question_text.clone(),
            published_date: Utc::now(),
        };
        tables.questions.insert(id, question.clone());
        tables.set_points(request.user_id, author_points);
        Ok(question)
    }

    async fn list_questions(&self) -> Result<Vec<QuestionWithAuthor>> {
        let tables = self.tables.read();
        // Ids are handed out in creation order, newest has the highest
        Ok(tables
            .questions
            .values()
            .rev()
            .map(|q| QuestionWithAuthor {
                id: q.id,
                user_id: q.user_id,
                title: q.title.clone(),
                question_text: q.question_text.clone(),
                published_date: q.published_date,
                username: tables.username(q.user_id),
            })
            .collect())
    }

    async fn create_answer(&self, request: &AnswerCreateDBRequest) -> Result<AnswerWithAuthor> {
        let mut tables = self.tables.write();

        if !tables.questions.contains_key(&request.question_id) {
            return Err(missing_reference("answers", "answers_question_id_fkey"));
        }
        if !tables.users.contains_key(&request.user_id) {
            return Err(missing_reference("answers", "answers_user_id_fkey"));
        }

        let id = Tables::next_id(&mut tables.next_answer_id);
        let answer = StoredAnswer {
            id,
            question_id: request.question_id,
            user_id: request.user_id,
            answer_text: request.answer_text.clone(),
            tips_count: 0,
        };
        let response = tables.with_author(&answer);
        tables.answers.insert(id, answer);
        Ok(response)
    }

    async fn list_answers(&self, question_id: QuestionId) -> Result<Vec<AnswerWithAuthor>> {
        let tables = self.tables.read();
        // BTreeMap iteration is already id ascending
        Ok(tables
            .answers
            .values()
            .filter(|a| a.question_id == question_id)
            .map(|a| tables.with_author(a))
            .collect())
    }

    async fn increment_tip_count(&self, answer_id: AnswerId) -> Result<i32> {
        let mut tables = self.tables.write();
        let tips_count = tables.tips_after_increment(answer_id)?;
        if let Some(answer) = tables.answers.get_mut(&answer_id) {
            answer.tips_count = tips_count;
        }
        Ok(tips_count)
    }

    async fn transfer_tip(&self, transfer: &TipTransfer) -> Result<TipReceipt> {
        let mut tables = self.tables.write();

        // Everything is computed before anything is written
        let source_points = tables.balance_after(transfer.source(), -transfer.amount())?;
        let destination_points = tables.balance_after(transfer.destination(), transfer.amount())?;
        let tips_count = tables.tips_after_increment(transfer.answer_id())?;

        tables.set_points(transfer.source(), source_points);
        tables.set_points(transfer.destination(), destination_points);
        if let Some(answer) = tables.answers.get_mut(&transfer.answer_id()) {
            answer.tips_count = tips_count;
        }

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

    #[tokio::test]
    async fn test_tipping_moves_points_and_counts() {
        contract::tipping_moves_points_and_counts(&InMemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_failed_tip_changes_nothing() {
        contract::failed_tip_changes_nothing(&InMemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        contract::duplicate_registration_conflicts(&InMemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_question_for_unknown_author_writes_nothing() {
        contract::question_for_unknown_author_writes_nothing(&InMemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_listing_order() {
        contract::listing_order(&InMemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_adjusting_points_has_no_floor() {
        contract::adjusting_points_has_no_floor(&InMemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_tip_counter_counts_up() {
        contract::tip_counter_counts_up(&InMemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_overflowing_tip_changes_nothing() {
        contract::overflowing_tip_changes_nothing(&InMemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_overflowing_question_writes_nothing() {
        contract::overflowing_question_writes_nothing(&InMemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_answer_to_unknown_question_is_rejected() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "cc:cc:cc:cc:cc:01", "carol").await;

        let err = store
            .create_answer(&AnswerCreateDBRequest {
                question_id: 99,
                user_id: user.id,
                answer_text: "into the void".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(store.list_answers(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_tips_conserve_points() {
        let store = InMemoryStore::new();
        let alice = seed_user(&store, "aa:aa:aa:aa:aa:09", "alice").await;
        let bob = seed_user(&store, "bb:bb:bb:bb:bb:09", "bob").await;
        let question = store
            .create_question(
                &QuestionCreateDBRequest {
                    user_id: alice.id,
                    title: "Send vs Sync".to_string(),
                    question_text: "What is the difference?".to_string(),
                },
                10,
            )
            .await
            .unwrap();
        let answer = store
            .create_answer(&AnswerCreateDBRequest {
                question_id: question.id,
                user_id: bob.id,
                answer_text: "Sync means &T is Send".to_string(),
            })
            .await
            .unwrap();

        let answer_id = answer.id;
        let tips = (0..20).map(|i| {
            let store = store.clone();
            let (source, destination) = if i % 2 == 0 { (alice.id, bob.id) } else { (bob.id, alice.id) };
            tokio::spawn(async move {
                let transfer = TipTransfer::new(source, destination, answer_id, 5).unwrap();
                store.transfer_tip(&transfer).await.unwrap()
            })
        });
        for result in futures::future::join_all(tips).await {
            result.unwrap();
        }

        let alice_after = store.get_user(alice.id).await.unwrap().unwrap().points;
        let bob_after = store.get_user(bob.id).await.unwrap().unwrap().points;
        assert_eq!(alice_after + bob_after, 190);
        assert_eq!(alice_after, 90);
        assert_eq!(store.list_answers(question.id).await.unwrap()[0].tips_count, 20);
    }
}
