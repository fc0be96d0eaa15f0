//! Database record models matching table schemas.
//!
//! These structs are what crosses the [`crate::store::ForumStore`] seam: both store backends
//! produce them, and the API layer converts them into response shapes.
//!
//! # Design Principles
//!
//! - **Schema Mapping**: Each model struct matches a table (or a table joined with its author)
//! - **SQLx Integration**: Read models derive `sqlx::FromRow` for query results
//! - **Separation**: Database models are distinct from API models, so the JSON contract can
//!   differ from the storage layout (e.g. the display date on question listings)
//!
//! - [`users`]: registered devices and their point balances
//! - [`questions`]: questions, optionally joined with the author's username
//! - [`answers`]: answers with tip counters, joined with the author's username

pub mod answers;
pub mod questions;
pub mod users;
