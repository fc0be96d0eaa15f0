//! API request and response data models.
//!
//! Request models are all-`Option` so that a missing field can be reported with the message each
//! endpoint promises instead of a generic deserialisation error. Response models are annotated
//! with `utoipa` for the OpenAPI document.
//!
//! - [`users`]: login and registration
//! - [`questions`]: posting and listing questions
//! - [`answers`]: posting and listing answers
//! - [`tips`]: tipping an answer's author

pub mod answers;
pub mod questions;
pub mod tips;
pub mod users;
