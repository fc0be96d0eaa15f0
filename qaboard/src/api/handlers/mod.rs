//! HTTP request handlers for all API endpoints.
//!
//! Each handler validates the fields it needs, calls the store (or the [`crate::ledger`] for
//! operations that move points), and shapes the JSON response. Handlers own no invariants.
//!
//! - [`auth`]: device login and registration
//! - [`questions`]: posting and listing questions
//! - [`answers`]: posting and listing answers
//! - [`tips`]: tipping
//! - [`system`]: greeting and health check
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`], which always becomes a 400 with a JSON string body.

pub mod answers;
pub mod auth;
pub mod questions;
pub mod system;
pub mod tips;
