//! Points ledger.
//!
//! The only operations that move points: tipping and posting a question. Both validate their
//! input before touching the store, hand the writes to the store as one unit, and record
//! metrics for what actually committed.
//!
//! Balances have no floor. Neither operation checks that the paying user can afford it.

use tracing::{debug, info, instrument, warn};

use crate::config::PointsConfig;
use crate::db::models::questions::{QuestionCreateDBRequest, QuestionDBResponse};
use crate::errors::{Error, Result};
use crate::metrics::points as metrics;
use crate::store::ForumStore;
use crate::types::{AnswerId, UserId};

/// A validated request to move points from one user to another in reward for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipTransfer {
    source: UserId,
    destination: UserId,
    answer_id: AnswerId,
    amount: i32,
}

impl TipTransfer {
    /// Fails with `BadRequest` when a user tries to tip themselves.
    pub fn new(source: UserId, destination: UserId, answer_id: AnswerId, amount: i32) -> Result<Self> {
        if source == destination {
            return Err(Error::bad_request("Bad request"));
        }
        Ok(Self {
            source,
            destination,
            answer_id,
            amount,
        })
    }

    pub fn source(&self) -> UserId {
        self.source
    }

    pub fn destination(&self) -> UserId {
        self.destination
    }

    pub fn answer_id(&self) -> AnswerId {
        self.answer_id
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    /// Balance changes as `(user, delta)` pairs, ordered by ascending user id.
    pub fn postings(&self) -> [(UserId, i32); 2] {
        let debit = (self.source, -self.amount);
        let credit = (self.destination, self.amount);
        if self.source < self.destination { [debit, credit] } else { [credit, debit] }
    }
}

/// What a committed tip left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipReceipt {
    pub tips_count: i32,
    pub source_points: i32,
    pub destination_points: i32,
}

/// Execute a tip. Unknown users or answers are reported as the raw store error.
#[instrument(skip(store), fields(source = transfer.source(), destination = transfer.destination(), answer_id = transfer.answer_id()))]
pub async fn tip(store: &dyn ForumStore, transfer: TipTransfer) -> Result<TipReceipt> {
    match store.transfer_tip(&transfer).await {
        Ok(receipt) => {
            metrics::record_tip(transfer.amount());
            info!(
                amount = transfer.amount(),
                tips_count = receipt.tips_count,
                "Tip transferred"
            );
            Ok(receipt)
        }
        Err(e) => {
            metrics::record_tip_error();
            warn!("Tip rolled back: {}", e);
            Err(Error::Database(e))
        }
    }
}

/// Post a question on behalf of `user_id`, charging the configured cost.
#[instrument(skip(store, policy, title, question_text))]
pub async fn post_question(
    store: &dyn ForumStore,
    policy: &PointsConfig,
    user_id: UserId,
    title: String,
    question_text: String,
) -> Result<QuestionDBResponse> {
    if title.trim().is_empty() || question_text.trim().is_empty() {
        return Err(Error::bad_request("bad request"));
    }

    let request = QuestionCreateDBRequest {
        user_id,
        title,
        question_text,
    };
    let question = store
        .create_question(&request, policy.question_cost)
        .await
        .map_err(Error::unavailable("add question"))?;

    metrics::record_question(policy.question_cost);
    debug!(question_id = question.id, cost = policy.question_cost, "Question posted");
    Ok(question)
}
