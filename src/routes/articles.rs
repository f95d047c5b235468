use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Article Router Module
///
/// Defines the article resource routes. Every route here — including creation —
/// sits behind the bearer-token middleware layered on in `create_router`; the
/// handlers never execute for an unauthenticated request.
///
/// Route order note: `/articles/drafts` is a static segment and must be
/// registered alongside the `/articles/{id}` matcher; Axum routes static
/// segments ahead of captures, so "drafts" is never parsed as an ID.
pub fn article_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /articles — submit a new article (always created as a draft).
        // GET  /articles — list every article regardless of published state.
        .route(
            "/articles",
            post(handlers::create_article).get(handlers::get_articles),
        )
        // GET /articles/drafts — list only unpublished articles.
        .route("/articles/drafts", get(handlers::get_drafts))
        // GET/PATCH/DELETE /articles/{id}
        // Single-record operations. PATCH applies partial updates (title, body,
        // and/or published); DELETE is permanent and returns the removed record.
        .route(
            "/articles/{id}",
            get(handlers::get_article)
                .patch(handlers::update_article)
                .delete(handlers::delete_article),
        )
}
