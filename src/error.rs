use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ApiError
///
/// The crate-wide error type for everything a request can fail with. Each variant
/// maps to exactly one HTTP status and one client-visible message, so error
/// responses stay uniform across handlers and the auth guard.
///
/// Security note: `InvalidCredentials` is deliberately shared by the
/// "no such user" and "wrong password" paths. Both produce the same kind and the
/// same message, so responses cannot be used to enumerate registered emails.
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    /// Login failed: unknown email or wrong password (intentionally indistinguishable).
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A protected route was called without a bearer token.
    #[error("missing bearer token")]
    MissingCredentials,

    /// A bearer token was present but its signature, shape, or expiry is invalid,
    /// or its subject no longer resolves to a user.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The requested record does not exist. Carries the client-visible message.
    #[error("{0}")]
    NotFound(String),

    /// The data store rejected or failed the operation. The inner detail is logged
    /// server-side only; clients receive a generic message.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl ApiError {
    /// Convenience constructor producing the canonical missing-article message.
    pub fn article_not_found(id: i32) -> Self {
        ApiError::NotFound(format!("Article with {id} does not exist."))
    }
}

// Store-level failures propagate unrecovered to the boundary; the conversion
// keeps the underlying detail for logging without exposing it to clients.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Persistence(err.to_string())
    }
}

/// ErrorBody
///
/// The JSON body of every error response, mirroring the key style of the
/// success envelope: `{ "statusCode": ..., "message": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::MissingCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::InvalidToken => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Persistence(detail) => {
                // The concrete store failure is for operators, not clients.
                tracing::error!(error = %detail, "persistence failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            status_code: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
