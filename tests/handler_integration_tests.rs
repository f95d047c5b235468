use async_trait::async_trait;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode};
use median_api::{
    AppState,
    auth::Claims,
    config::AppConfig,
    error::ApiError,
    handlers,
    models::{Article, CreateArticleRequest, LoginRequest, UpdateArticleRequest, User},
    repository::Repository,
};
use std::sync::Arc;
use tokio::test;

// --- MOCK REPOSITORY IMPLEMENTATION ---

// Central control point for testing handler logic: handlers depend on the
// Repository trait, so we mock the trait implementation with canned outputs.
pub struct MockRepoControl {
    pub user_by_email: Option<User>,
    pub article_to_return: Option<Article>,
    pub articles_to_return: Vec<Article>,
    pub update_result: Option<Article>,
    pub delete_result: Option<Article>,
}

impl Default for MockRepoControl {
    fn default() -> Self {
        MockRepoControl {
            user_by_email: None,
            article_to_return: Some(Article::default()),
            articles_to_return: vec![],
            update_result: Some(Article::default()),
            delete_result: Some(Article::default()),
        }
    }
}

#[async_trait]
impl Repository for MockRepoControl {
    async fn get_user(&self, _id: i32) -> Result<Option<User>, sqlx::Error> {
        Ok(self.user_by_email.clone())
    }
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .user_by_email
            .clone()
            .filter(|user| user.email == email))
    }
    async fn create_article(&self, req: CreateArticleRequest) -> Result<Article, sqlx::Error> {
        // Mirrors the Postgres implementation: published is hardcoded to false.
        Ok(Article {
            id: 1,
            title: req.title,
            body: req.body,
            published: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
    async fn get_articles(&self) -> Result<Vec<Article>, sqlx::Error> {
        Ok(self.articles_to_return.clone())
    }
    async fn get_draft_articles(&self) -> Result<Vec<Article>, sqlx::Error> {
        Ok(self
            .articles_to_return
            .clone()
            .into_iter()
            .filter(|a| !a.published)
            .collect())
    }
    async fn get_article(&self, _id: i32) -> Result<Option<Article>, sqlx::Error> {
        Ok(self.article_to_return.clone())
    }
    async fn update_article(
        &self,
        _id: i32,
        _req: UpdateArticleRequest,
    ) -> Result<Option<Article>, sqlx::Error> {
        Ok(self.update_result.clone())
    }
    async fn delete_article(&self, _id: i32) -> Result<Option<Article>, sqlx::Error> {
        Ok(self.delete_result.clone())
    }
}

// --- TEST UTILITIES ---

const TEST_ARTICLE_ID: i32 = 7;

// Creates an AppState using the mock repository and the default test config.
fn create_test_state(repo_control: MockRepoControl) -> AppState {
    AppState {
        repo: Arc::new(repo_control),
        config: AppConfig::default(),
    }
}

// bcrypt cost 4 keeps tests fast; DEFAULT_COST is for production hashes only.
fn seeded_user(password: &str) -> User {
    User {
        id: 1,
        email: "alice@example.com".to_string(),
        password_hash: bcrypt::hash(password, 4).unwrap(),
    }
}

fn sample_article(id: i32, published: bool) -> Article {
    Article {
        id,
        title: format!("Article {id}"),
        body: "body".to_string(),
        published,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// --- LOGIN HANDLER TESTS ---

#[test]
async fn test_login_success_issues_decodable_token() {
    let state = create_test_state(MockRepoControl {
        user_by_email: Some(seeded_user("password123")),
        ..MockRepoControl::default()
    });
    let secret = state.config.jwt_secret.clone();
    let ttl = state.config.jwt_ttl_seconds;

    let result = handlers::login(
        State(state),
        Json(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        }),
    )
    .await;

    let envelope = result.unwrap();
    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.message, "access token generated");

    // The issued token must decode with the process secret and carry the user id
    // plus the configured TTL.
    let token_data = decode::<Claims>(
        &envelope.result.access_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .expect("issued token should validate");
    assert_eq!(token_data.claims.sub, 1);
    assert_eq!(
        token_data.claims.exp - token_data.claims.iat,
        ttl as usize
    );
}

#[test]
async fn test_login_wrong_password_and_unknown_email_fail_identically() {
    let state = create_test_state(MockRepoControl {
        user_by_email: Some(seeded_user("password123")),
        ..MockRepoControl::default()
    });

    let wrong_password = handlers::login(
        State(state.clone()),
        Json(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "not-the-password".to_string(),
        }),
    )
    .await
    .unwrap_err();

    let unknown_email = handlers::login(
        State(state),
        Json(LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "password123".to_string(),
        }),
    )
    .await
    .unwrap_err();

    // Same kind AND same observable message: no user enumeration.
    assert_eq!(wrong_password, ApiError::InvalidCredentials);
    assert_eq!(unknown_email, ApiError::InvalidCredentials);
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

// --- ARTICLE HANDLER TESTS ---

#[test]
async fn test_create_article_starts_as_draft() {
    let state = create_test_state(MockRepoControl::default());

    let envelope = handlers::create_article(
        State(state),
        Json(CreateArticleRequest {
            title: "A".to_string(),
            body: "B".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(envelope.status_code, 201);
    assert_eq!(envelope.message, "Article Created Successfully");
    assert_eq!(envelope.result.title, "A");
    assert!(!envelope.result.published);
}

#[test]
async fn test_get_articles_returns_all_states() {
    let state = create_test_state(MockRepoControl {
        articles_to_return: vec![sample_article(1, false), sample_article(2, true)],
        ..MockRepoControl::default()
    });

    let envelope = handlers::get_articles(State(state)).await.unwrap();

    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.result.len(), 2);
}

#[test]
async fn test_get_drafts_is_unpublished_subset() {
    let state = create_test_state(MockRepoControl {
        articles_to_return: vec![
            sample_article(1, false),
            sample_article(2, true),
            sample_article(3, false),
        ],
        ..MockRepoControl::default()
    });

    let envelope = handlers::get_drafts(State(state)).await.unwrap();

    assert_eq!(envelope.result.len(), 2);
    assert!(envelope.result.iter().all(|a| !a.published));
}

#[test]
async fn test_get_article_success() {
    let article = sample_article(TEST_ARTICLE_ID, false);
    let state = create_test_state(MockRepoControl {
        article_to_return: Some(article.clone()),
        ..MockRepoControl::default()
    });

    let envelope = handlers::get_article(State(state), Path(TEST_ARTICLE_ID))
        .await
        .unwrap();

    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.result.id, article.id);
}

#[test]
async fn test_get_article_not_found() {
    let state = create_test_state(MockRepoControl {
        article_to_return: None,
        ..MockRepoControl::default()
    });

    let err = handlers::get_article(State(state), Path(TEST_ARTICLE_ID))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::NotFound("Article with 7 does not exist.".to_string())
    );
}

#[test]
async fn test_update_article_pre_checks_existence() {
    // The lookup says the article is gone, even though the mock's update would
    // "succeed": the handler must 404 from the pre-check alone.
    let state = create_test_state(MockRepoControl {
        article_to_return: None,
        update_result: Some(sample_article(TEST_ARTICLE_ID, true)),
        ..MockRepoControl::default()
    });

    let err = handlers::update_article(
        State(state),
        Path(TEST_ARTICLE_ID),
        Json(UpdateArticleRequest {
            published: Some(true),
            ..UpdateArticleRequest::default()
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(err, ApiError::article_not_found(TEST_ARTICLE_ID));
}

#[test]
async fn test_update_article_success() {
    let updated = sample_article(TEST_ARTICLE_ID, true);
    let state = create_test_state(MockRepoControl {
        article_to_return: Some(sample_article(TEST_ARTICLE_ID, false)),
        update_result: Some(updated.clone()),
        ..MockRepoControl::default()
    });

    let envelope = handlers::update_article(
        State(state),
        Path(TEST_ARTICLE_ID),
        Json(UpdateArticleRequest {
            published: Some(true),
            ..UpdateArticleRequest::default()
        }),
    )
    .await
    .unwrap();

    assert_eq!(envelope.message, "Article Updated Successfully");
    assert!(envelope.result.published);
}

#[test]
async fn test_delete_article_returns_last_known_state() {
    let removed = sample_article(TEST_ARTICLE_ID, true);
    let state = create_test_state(MockRepoControl {
        article_to_return: Some(removed.clone()),
        delete_result: Some(removed.clone()),
        ..MockRepoControl::default()
    });

    let envelope = handlers::delete_article(State(state), Path(TEST_ARTICLE_ID))
        .await
        .unwrap();

    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.message, "Article Removed Successfully");
    assert_eq!(envelope.result.id, removed.id);
    assert_eq!(envelope.result.title, removed.title);
}

#[test]
async fn test_delete_article_not_found() {
    let state = create_test_state(MockRepoControl {
        article_to_return: None,
        delete_result: None,
        ..MockRepoControl::default()
    });

    let err = handlers::delete_article(State(state), Path(TEST_ARTICLE_ID))
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::article_not_found(TEST_ARTICLE_ID));
}
