use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The canonical identity record stored in the `users` table, including the
/// bcrypt password hash needed by the credential verifier.
///
/// **Deliberately not `Serialize`**: this struct must never cross the HTTP
/// boundary. Handlers emit [`UserResponse`] instead, which strips the hash.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: i32,
    // The user's primary identifier; unique at the database level.
    pub email: String,
    // bcrypt hash of the user's password. Never logged, never serialized.
    pub password_hash: String,
}

/// UserResponse
///
/// The outward-facing projection of a [`User`]. Converting through this type is
/// the explicit serialization step that drops the password hash before any
/// record leaves the auth components.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Article
///
/// An article record from the `articles` table. This is the primary data
/// structure for the core business logic.
///
/// Invariants: `id` is immutable once assigned; `published` defaults to false
/// on creation and only changes via an explicit update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub body: String,
    // Draft flag: false = draft, true = published. A plain boolean because the
    // domain has exactly two states with unconstrained, symmetric transitions.
    pub published: bool,

    // Timestamp handling for database integration and JSON serialization.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for the login endpoint (POST /auth/login).
/// The plaintext password is only ever compared against the stored bcrypt hash;
/// it is never persisted or logged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// CreateArticleRequest
///
/// Input payload for submitting a new article (POST /articles).
/// The `published` state is not accepted here: every new article starts as a draft.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreateArticleRequest {
    pub title: String,
    pub body: String,
}

/// UpdateArticleRequest
///
/// Partial update payload for modifying an existing article (PATCH /articles/{id}).
///
/// Uses `Option<T>` for all fields and `#[serde(skip_serializing_if = "Option::is_none")]`
/// so only the provided fields are applied; omitted fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

// --- Response Shapes (Output Schemas) ---

/// AuthToken
///
/// Output schema of a successful login: the signed, time-limited bearer token.
/// The token itself is opaque to clients; its claims are only meaningful to the
/// auth guard holding the signing secret.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub access_token: String,
}

/// ApiResponse
///
/// The uniform success envelope every endpoint emits:
/// `{ "statusCode": ..., "message": ..., "result": ... }`.
/// Implements `IntoResponse` so handlers can return it directly and the HTTP
/// status always matches the embedded `statusCode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub message: String,
    pub result: T,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, message: &str, result: T) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.to_string(),
            result,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
