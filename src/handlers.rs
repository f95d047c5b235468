use crate::{
    AppState,
    auth::{issue_token, verify_credentials},
    error::ApiError,
    models::{
        ApiResponse, Article, AuthToken, CreateArticleRequest, LoginRequest, UpdateArticleRequest,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

// --- Auth Handlers ---

/// login
///
/// [Public Route] Verifies an email/password pair and issues a signed bearer token.
///
/// *Security*: Credential verification never reveals whether the email exists;
/// wrong-password and unknown-email both answer 401 with the same message.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token generated", body = AuthToken),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<AuthToken>, ApiError> {
    let user = verify_credentials(&state.repo, &payload.email, &payload.password).await?;
    let token = issue_token(user.id, &state.config)?;

    Ok(ApiResponse::new(
        StatusCode::OK,
        "access token generated",
        AuthToken {
            access_token: token,
        },
    ))
}

// --- Article Handlers ---

/// create_article
///
/// [Authenticated Route] Handles the submission of a new article.
/// Every new article is created as a draft (`published = false`), regardless of payload.
#[utoipa::path(
    post,
    path = "/articles",
    request_body = CreateArticleRequest,
    responses((status = 201, description = "Created", body = Article))
)]
pub async fn create_article(
    State(state): State<AppState>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<ApiResponse<Article>, ApiError> {
    let article = state.repo.create_article(payload).await?;
    Ok(ApiResponse::new(
        StatusCode::CREATED,
        "Article Created Successfully",
        article,
    ))
}

/// get_articles
///
/// [Authenticated Route] Lists every article regardless of published state,
/// in insertion order.
#[utoipa::path(
    get,
    path = "/articles",
    responses((status = 200, description = "All articles", body = [Article]))
)]
pub async fn get_articles(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Article>>, ApiError> {
    let articles = state.repo.get_articles().await?;
    Ok(ApiResponse::new(
        StatusCode::OK,
        "Articles Fetched Successfully",
        articles,
    ))
}

/// get_drafts
///
/// [Authenticated Route] Lists only unpublished articles. Always a subset of
/// `get_articles`: exactly the records where `published = false`.
#[utoipa::path(
    get,
    path = "/articles/drafts",
    responses((status = 200, description = "Draft articles", body = [Article]))
)]
pub async fn get_drafts(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Article>>, ApiError> {
    let drafts = state.repo.get_draft_articles().await?;
    Ok(ApiResponse::new(
        StatusCode::OK,
        "Articles Fetched Successfully",
        drafts,
    ))
}

/// get_article
///
/// [Authenticated Route] Retrieves a single article by ID, or a 404 if absent.
#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Found", body = Article),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<Article>, ApiError> {
    let article = state
        .repo
        .get_article(id)
        .await?
        .ok_or_else(|| ApiError::article_not_found(id))?;

    Ok(ApiResponse::new(
        StatusCode::OK,
        "Article Fetched Successfully",
        article,
    ))
}

/// update_article
///
/// [Authenticated Route] Applies a partial update: only the fields present in the
/// payload change; omitted fields are left untouched, including `published`.
///
/// Existence is pre-checked via `get_article` so a missing ID answers 404 before
/// any mutation is attempted. The UPDATE itself also guards on the ID, so a
/// concurrent delete between check and update still yields 404 rather than a
/// phantom success.
#[utoipa::path(
    patch,
    path = "/articles/{id}",
    params(("id" = i32, Path, description = "Article ID")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Updated", body = Article),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<ApiResponse<Article>, ApiError> {
    state
        .repo
        .get_article(id)
        .await?
        .ok_or_else(|| ApiError::article_not_found(id))?;

    let article = state
        .repo
        .update_article(id, payload)
        .await?
        .ok_or_else(|| ApiError::article_not_found(id))?;

    Ok(ApiResponse::new(
        StatusCode::OK,
        "Article Updated Successfully",
        article,
    ))
}

/// delete_article
///
/// [Authenticated Route] Permanently removes an article and echoes its last known
/// state back to the caller. No soft-delete: a subsequent lookup answers 404.
#[utoipa::path(
    delete,
    path = "/articles/{id}",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Removed", body = Article),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<Article>, ApiError> {
    state
        .repo
        .get_article(id)
        .await?
        .ok_or_else(|| ApiError::article_not_found(id))?;

    let article = state
        .repo
        .delete_article(id)
        .await?
        .ok_or_else(|| ApiError::article_not_found(id))?;

    Ok(ApiResponse::new(
        StatusCode::OK,
        "Article Removed Successfully",
        article,
    ))
}
