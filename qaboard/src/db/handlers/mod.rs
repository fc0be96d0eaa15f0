//! Repository implementations for database access.
//!
//! Each repository wraps a `&mut PgConnection` (usually a transaction) and provides strongly
//! typed operations returning models from [`crate::db::models`]. Repositories never open their
//! own transactions: the caller decides the unit of work, which is how the
//! [`crate::store::PostgresStore`] makes multi-statement operations all-or-nothing.
//!
//! ```ignore
//! use qaboard::db::handlers::Users;
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut users = Users::new(&mut tx);
//!     users.adjust_points(1, -5).await?;
//!     users.adjust_points(2, 5).await?;
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```
//!
//! - [`Users`]: identity store (hardware address lookup, registration, point balances)
//! - [`Questions`]: question posting and listing
//! - [`Answers`]: answers and their tip counters

pub mod answers;
pub mod questions;
pub mod users;

pub use answers::Answers;
pub use questions::Questions;
pub use users::Users;
