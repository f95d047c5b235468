use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// This is deliberately the smallest surface of the application: a liveness
/// probe and the login gateway that issues bearer tokens for everything else.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/login
        // Verifies email/password credentials and returns {accessToken} on success.
        // Failures are uniform 401s that never reveal whether the email exists.
        .route("/auth/login", post(handlers::login))
}
