//! The injected store handle.
//!
//! Every handler reaches persistence through an `Arc<dyn ForumStore>` carried in
//! [`crate::AppState`]. Two backends exist:
//!
//! - [`PostgresStore`]: production backend; multi-statement operations run inside one
//!   transaction built from the [`crate::db::handlers`] repositories.
//! - [`InMemoryStore`]: a single `RwLock` over plain maps. Used by the HTTP tests and by
//!   `database.type: memory` for local runs. Data is lost on restart.
//!
//! Both backends report failures as [`crate::db::errors::DbError`] so the API layer translates them the same way.

use async_trait::async_trait;

use crate::db::errors::Result;
use crate::db::models::{
    answers::{AnswerCreateDBRequest, AnswerWithAuthor},
    questions::{QuestionCreateDBRequest, QuestionDBResponse, QuestionWithAuthor},
    users::{UserCreateDBRequest, UserDBResponse},
};
use crate::ledger::{TipReceipt, TipTransfer};
use crate::types::{AnswerId, MacAddress, QuestionId, UserId};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Persistence for users, questions and answers.
#[async_trait]
pub trait ForumStore: Send + Sync {
    /// Look a device up by hardware address.
    async fn find_user_by_address(&self, address: &MacAddress) -> Result<Option<UserDBResponse>>;

    async fn get_user(&self, id: UserId) -> Result<Option<UserDBResponse>>;

    /// Register a device.
    ///
    /// # Errors
    /// - `UniqueViolation` on `users_mac_address_key` if the address is already registered
    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse>;

    /// Add `delta` to a balance and return the new balance. No floor is applied.
    ///
    /// # Errors
    /// - `NotFound { entity: "user" }` if the user does not exist
    /// - `Other` if the balance would leave the `i32` range; the balance is unchanged
    async fn adjust_points(&self, id: UserId, delta: i32) -> Result<i32>;

    /// Insert a question and debit `cost` points from its author as one unit.
    ///
    /// # Errors
    /// - `ForeignKeyViolation` if the author does not exist; nothing is written
    async fn create_question(&self, request: &QuestionCreateDBRequest, cost: i32) -> Result<QuestionDBResponse>;

    /// All questions with author names, newest first.
    async fn list_questions(&self) -> Result<Vec<QuestionWithAuthor>>;

    /// Insert an answer and return it with its author's name.
    async fn create_answer(&self, request: &AnswerCreateDBRequest) -> Result<AnswerWithAuthor>;

    /// Answers to one question, oldest first.
    async fn list_answers(&self, question_id: QuestionId) -> Result<Vec<AnswerWithAuthor>>;

    /// Bump an answer's tip counter and return its new value.
    async fn increment_tip_count(&self, answer_id: AnswerId) -> Result<i32>;

    /// Move points between two users and bump the answer's tip counter, all or nothing.
    ///
    /// # Errors
    /// - `NotFound { entity: "user" }` if either user is missing
    /// - `NotFound { entity: "answer" }` if the answer is missing
    /// - `Other` if a balance or the counter would leave the `i32` range
    async fn transfer_tip(&self, transfer: &TipTransfer) -> Result<TipReceipt>;
}
