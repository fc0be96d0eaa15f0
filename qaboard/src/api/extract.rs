//! Lenient JSON body extraction.
//!
//! Clients of this API send small flat objects and expect a malformed body to be answered the
//! same way as a body with missing fields. [`Payload`] therefore never rejects: a body that
//! fails to parse becomes `T::default()`, and every request model is a struct of `Option`s whose
//! handler reports what is missing.

use std::convert::Infallible;

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Payload(value)),
            Err(rejection) => {
                debug!("Unreadable request body treated as empty: {}", rejection.body_text());
                Ok(Payload(T::default()))
            }
        }
    }
}

/// Unwrap a required field, or fail with `message`.
pub fn required<T>(field: Option<T>, message: &str) -> crate::errors::Result<T> {
    field.ok_or_else(|| crate::errors::Error::bad_request(message))
}

/// Unwrap a required text field that must also be non-blank.
pub fn required_text(field: Option<String>, message: &str) -> crate::errors::Result<String> {
    match field {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(crate::errors::Error::bad_request(message)),
    }
}
