//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all endpoints
//! - **[`models`]**: Request/response data structures
//! - **[`extract`]**: The lenient JSON body extractor every `POST` handler uses
//!
//! Every failure is answered with status 400 and a JSON string body; see [`crate::errors`].
//! API documentation is served at `/docs` when the server is running.

pub mod extract;
pub mod handlers;
pub mod models;
