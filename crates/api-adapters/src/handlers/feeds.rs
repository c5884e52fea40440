//! The global feed.

use axum::extract::{Query, State};
use axum::Json;
use domains::{Page, PostView};

use super::FeedQuery;
use crate::error::ApiResult;
use crate::state::ApiState;

/// `GET /feed?page=N`: every post on the site, newest first, five per page.
pub async fn global(
    State(state): State<ApiState>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<Page<PostView>>> {
    Ok(Json(state.feed.global(query.page()).await?))
}
