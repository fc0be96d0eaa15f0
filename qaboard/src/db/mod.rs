//! Database layer for data persistence and access.
//!
//! Repositories in [`handlers`] wrap a single connection and issue runtime-checked SQLx queries
//! against the schema in `migrations/`. They are composed into transactions by
//! [`crate::store::PostgresStore`].
//!
//! ```text
//! ┌─────────────┐
//! │ ForumStore  │  (store::PostgresStore - units of work)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - one table each)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types

pub mod errors;
pub mod handlers;
pub mod models;
