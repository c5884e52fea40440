//! Community listing, creation, detail, deletion, and subscriptions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::Community;
use serde::Deserialize;
use serde_json::json;

use super::FeedQuery;
use crate::error::ApiResult;
use crate::extract::{CurrentUser, MaybeUser};
use crate::state::ApiState;

/// `GET /communities`
pub async fn list(State(state): State<ApiState>) -> ApiResult<Json<Vec<Community>>> {
    Ok(Json(state.communities.list().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    pub name: String,
    pub description: Option<String>,
}

/// `POST /communities`: any authenticated user may create one; the slug
/// is derived here, once.
pub async fn create(
    State(state): State<ApiState>,
    user: CurrentUser,
    Json(body): Json<CreateBody>,
) -> ApiResult<(StatusCode, Json<Community>)> {
    let community = state
        .communities
        .create(&user.0, &body.name, body.description)
        .await?;
    Ok((StatusCode::CREATED, Json(community)))
}

/// `GET /communities/{slug}?page=N`: the community, its subscriber
/// count, whether the caller subscribes, and a feed page.
pub async fn detail(
    State(state): State<ApiState>,
    MaybeUser(viewer): MaybeUser,
    Path(slug): Path<String>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let (community, feed) = state.feed.community(&slug, query.page()).await?;
    let subscribers = state.communities.subscriber_count(&slug).await?;
    let subscribed = match &viewer {
        Some(user) => state.communities.is_subscribed(user, &slug).await?,
        None => false,
    };
    Ok(Json(json!({
        "community": community,
        "subscribers": subscribers,
        "subscribed": subscribed,
        "feed": feed,
    })))
}

/// `DELETE /communities/{slug}`: admin-only; cascades to every post in
/// the community.
pub async fn remove(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    state.communities.delete(&user.0, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /communities/{slug}/subscription`: idempotent.
pub async fn subscribe(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    state.communities.subscribe(&user.0, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /communities/{slug}/subscription`: idempotent.
pub async fn unsubscribe(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    state.communities.unsubscribe(&user.0, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
