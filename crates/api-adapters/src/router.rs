//! Route table and shared middleware.
//!
//! The router is kept free of filesystem concerns; the binary nests the
//! media `ServeDir` under the configured prefix itself.

use axum::http::Method;
use axum::routing::{get, post, put};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, comments, communities, feeds, posts, votes};
use crate::metrics;
use crate::state::ApiState;

/// Builds the API router. The main binary mounts this at `/`.
pub fn router(state: ApiState) -> Router {
    Router::new()
        // Feeds
        .route("/feed", get(feeds::global))
        // Accounts
        .route("/auth/register", post(accounts::register))
        .route("/auth/login", post(accounts::login))
        .route("/auth/me", get(accounts::me))
        .route("/users/{username}", get(accounts::profile))
        .route("/users/me/profile", axum::routing::patch(accounts::edit_profile))
        .route("/users/me/avatar", put(accounts::set_avatar))
        // Communities
        .route("/communities", get(communities::list).post(communities::create))
        .route(
            "/communities/{slug}",
            get(communities::detail).delete(communities::remove),
        )
        .route(
            "/communities/{slug}/subscription",
            put(communities::subscribe).delete(communities::unsubscribe),
        )
        // Posts
        .route("/posts", post(posts::create))
        .route(
            "/posts/{id}",
            get(posts::detail).patch(posts::edit).delete(posts::remove),
        )
        .route("/posts/{id}/comments", post(comments::create))
        .route("/posts/{id}/upvote", post(votes::upvote))
        .route("/posts/{id}/downvote", post(votes::downvote))
        // Comments
        .route(
            "/comments/{id}",
            axum::routing::patch(comments::edit).delete(comments::remove),
        )
        // Observability
        .route("/metrics", get(metrics::export))
        .layer(middleware::from_fn_with_state(state.clone(), metrics::track))
        .layer(TraceLayer::new_for_http())
        .layer(cors_policy())
        .with_state(state)
}

/// Permissive CORS for now; the UI and API may live on different origins.
pub fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers(Any)
}
