use crate::models::{Article, CreateArticleRequest, UpdateArticleRequest, User};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable and usable across Axum's asynchronous task boundaries.
///
/// Error semantics: "record absent" is modeled as `Ok(None)`; an `Err` always
/// means the store itself failed (connectivity, constraint violation) and is
/// surfaced to the boundary as a generic server error.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- User/Auth ---
    // Lookup by primary key; used by the auth guard to resolve token subjects.
    async fn get_user(&self, id: i32) -> Result<Option<User>, sqlx::Error>;
    // Lookup by email; used by the credential verifier during login.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    // --- Article Lifecycle ---
    // Inserts a new article. Every new article starts as a draft (published = false).
    async fn create_article(&self, req: CreateArticleRequest) -> Result<Article, sqlx::Error>;
    // Retrieves every article regardless of published state, in insertion order.
    async fn get_articles(&self) -> Result<Vec<Article>, sqlx::Error>;
    // Retrieves only unpublished articles; same ordering as `get_articles`.
    async fn get_draft_articles(&self) -> Result<Vec<Article>, sqlx::Error>;
    async fn get_article(&self, id: i32) -> Result<Option<Article>, sqlx::Error>;
    // Partial update via COALESCE: only fields present in `req` change.
    async fn update_article(
        &self,
        id: i32,
        req: UpdateArticleRequest,
    ) -> Result<Option<Article>, sqlx::Error>;
    // Hard delete; returns the last known state of the removed row.
    async fn delete_article(&self, id: i32) -> Result<Option<Article>, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// get_user
    ///
    /// Retrieves the full user record (including the password hash) by primary key.
    /// Callers outside the auth components must only ever see the stripped
    /// `UserResponse` projection.
    async fn get_user(&self, id: i32) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, email, password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// get_user_by_email
    ///
    /// Credential lookup for the login flow. Absence is reported as `Ok(None)` so the
    /// verifier can collapse it into the same error as a wrong password.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, email, password_hash FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// create_article
    ///
    /// Inserts a new article. `published` is hardcoded to false in the statement,
    /// not taken from the payload: drafts are the only possible creation state.
    async fn create_article(&self, req: CreateArticleRequest) -> Result<Article, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (title, body, published, created_at, updated_at)
            VALUES ($1, $2, false, NOW(), NOW())
            RETURNING id, title, body, published, created_at, updated_at
            "#,
        )
        .bind(req.title)
        .bind(req.body)
        .fetch_one(&self.pool)
        .await
    }

    /// get_articles
    ///
    /// Returns all articles regardless of published state. Ordered by `id`, which
    /// for a serial key is insertion order.
    async fn get_articles(&self) -> Result<Vec<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            "SELECT id, title, body, published, created_at, updated_at FROM articles ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// get_draft_articles
    ///
    /// The `published = false` subset of `get_articles`, same ordering.
    async fn get_draft_articles(&self) -> Result<Vec<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, body, published, created_at, updated_at
            FROM articles
            WHERE published = false
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// get_article
    ///
    /// Simple retrieval by ID. Handlers translate `None` into the 404 response
    /// before attempting any follow-up mutation.
    async fn get_article(&self, id: i32) -> Result<Option<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            "SELECT id, title, body, published, created_at, updated_at FROM articles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// update_article
    ///
    /// Uses the PostgreSQL `COALESCE` function to efficiently handle `Option<T>` fields,
    /// only updating a column if the corresponding field in `req` is `Some`.
    /// The `WHERE id` clause doubles as an internal existence guard: a vanished row
    /// yields `Ok(None)` even if the handler's pre-check raced with a delete.
    async fn update_article(
        &self,
        id: i32,
        req: UpdateArticleRequest,
    ) -> Result<Option<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET title = COALESCE($2, title),
                body = COALESCE($3, body),
                published = COALESCE($4, published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, body, published, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.title)
        .bind(req.body)
        .bind(req.published)
        .fetch_optional(&self.pool)
        .await
    }

    /// delete_article
    ///
    /// Permanent deletion (no soft-delete). `RETURNING` hands back the final state
    /// of the removed row so the caller can echo it to the client.
    async fn delete_article(&self, id: i32) -> Result<Option<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            DELETE FROM articles
            WHERE id = $1
            RETURNING id, title, body, published, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
