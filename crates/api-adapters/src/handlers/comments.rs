//! Comment creation, edit, and deletion.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::Comment;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub content: String,
}

/// `POST /posts/{id}/comments`
pub async fn create(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CommentBody>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = state
        .content
        .create_comment(&user.0, post_id, body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// `PATCH /comments/{id}`: author-only.
pub async fn edit(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CommentBody>,
) -> ApiResult<Json<Comment>> {
    let comment = state.content.edit_comment(&user.0, id, body.content).await?;
    Ok(Json(comment))
}

/// `DELETE /comments/{id}`: author-only.
pub async fn remove(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.content.delete_comment(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
