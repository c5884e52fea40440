//! Vote endpoints.
//!
//! Both are toggles, not absolute writes: repeating an intent retracts
//! it, the opposite intent switches it. They return no body; the score
//! is derived on demand wherever posts are read.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::state::ApiState;

/// `POST /posts/{id}/upvote`
pub async fn upvote(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(post_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.votes.apply_upvote(&user.0, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /posts/{id}/downvote`
pub async fn downvote(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(post_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.votes.apply_downvote(&user.0, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
