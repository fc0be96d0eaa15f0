use crate::db::errors::DbError;
use crate::types::MacAddress;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Missing or malformed request fields, or a business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Login attempt from a device that has never registered
    #[error("No user registered for {address}")]
    UnregisteredAddress { address: MacAddress },

    /// The operation collides with existing state, e.g. a duplicate registration
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// A store failure reported to the client with a fixed public message
    #[error("Failed to {operation}")]
    Unavailable {
        operation: &'static str,
        #[source]
        source: DbError,
    },

    /// Store error reported to the client as-is
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest { message: message.into() }
    }

    pub fn unavailable(operation: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| Error::Unavailable { operation, source }
    }

    /// Every failure on this API is a 400; the body tells clients apart.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. }
            | Error::UnregisteredAddress { .. }
            | Error::Conflict { .. }
            | Error::Unavailable { .. }
            | Error::Database(_)
            | Error::Other(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The JSON string written as the response body
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            Error::UnregisteredAddress { .. } => "new_user".to_string(),
            Error::Conflict { message } => message.clone(),
            Error::Unavailable { operation, .. } => format!("unable to {operation}"),
            Error::Database(db_err) => match db_err {
                DbError::UniqueViolation { message, .. }
                | DbError::ForeignKeyViolation { message, .. }
                | DbError::CheckViolation { message, .. } => message.clone(),
                DbError::NotFound { .. } | DbError::Other(_) => db_err.to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Unavailable { source, .. } => {
                tracing::error!(error = %source, "Store error: {}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database error: {}", self);
            }
            Error::Conflict { .. } => {
                tracing::warn!("Conflict error: {}", self);
            }
            Error::BadRequest { .. } | Error::UnregisteredAddress { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        (self.status_code(), Json(self.user_message())).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_every_error_is_bad_request_with_json_string() {
        let cases = vec![
            (Error::bad_request("bad request"), "bad request"),
            (
                Error::UnregisteredAddress {
                    address: MacAddress::new("aa:bb:cc:dd:ee:ff"),
                },
                "new_user",
            ),
            (
                Error::Conflict {
                    message: "user already exists".to_string(),
                },
                "user already exists",
            ),
            (Error::unavailable("get questions")(DbError::Other(anyhow::anyhow!("pool closed"))), "unable to get questions"),
            (Error::Database(DbError::not_found("answer")), "answer not found"),
            (Error::Other(anyhow::anyhow!("boom")), "Internal server error"),
        ];

        for (error, expected) in cases {
            let (status, body) = body_of(error).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, serde_json::Value::String(expected.to_string()));
        }
    }

    #[test]
    fn test_constraint_errors_surface_the_raw_message() {
        let err = Error::Database(DbError::ForeignKeyViolation {
            constraint: Some("answers_question_id_fkey".to_string()),
            table: Some("answers".to_string()),
            message: "insert or update on table \"answers\" violates foreign key constraint".to_string(),
        });
        assert_eq!(
            err.user_message(),
            "insert or update on table \"answers\" violates foreign key constraint"
        );
    }
}
