//! Post creation, detail, edit, and deletion.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{FieldErrors, Post, Upload};
use serde::Deserialize;
use serde_json::json;
use services::{EditPost, NewPost};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extract::CurrentUser;
use crate::state::ApiState;

pub(crate) fn multipart_error(err: MultipartError) -> ApiError {
    ApiError(FieldErrors::single("form", format!("malformed multipart body: {err}")))
}

/// Drains one multipart file field into an [`Upload`], sniffing the MIME
/// type from the part header first and the filename second.
pub(crate) async fn read_upload(field: Field<'_>) -> ApiResult<Option<Upload>> {
    let declared = field
        .content_type()
        .and_then(|raw| raw.parse::<mime::Mime>().ok());
    let guessed = field
        .file_name()
        .and_then(|name| mime_guess::from_path(name).first());
    let content_type = declared
        .or(guessed)
        .unwrap_or(mime::APPLICATION_OCTET_STREAM);

    let data = field.bytes().await.map_err(multipart_error)?;
    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(Upload { data, content_type }))
}

/// `POST /posts`: multipart form with `title`, optional `content`,
/// optional `community` (slug), and an optional `image` file.
pub async fn create(
    State(state): State<ApiState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let mut new = NewPost::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or_default() {
            "title" => new.title = field.text().await.map_err(multipart_error)?,
            "content" => new.content = Some(field.text().await.map_err(multipart_error)?),
            "community" => {
                let slug = field.text().await.map_err(multipart_error)?;
                if !slug.trim().is_empty() {
                    new.community_slug = Some(slug.trim().to_string());
                }
            }
            "image" => new.image = read_upload(field).await?,
            _ => {}
        }
    }
    let post = state.content.create_post(&user.0, new).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// `GET /posts/{id}`: the denormalized view plus its comment thread.
///
/// Image and avatar references are media ids; the files themselves are
/// served under the media URL prefix.
pub async fn detail(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let (view, comments) = state.content.post_detail(id).await?;
    Ok(Json(json!({ "post": view, "comments": comments })))
}

#[derive(Debug, Deserialize)]
pub struct EditBody {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// `PATCH /posts/{id}`: author-only.
pub async fn edit(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<EditBody>,
) -> ApiResult<Json<Post>> {
    let post = state
        .content
        .edit_post(
            &user.0,
            id,
            EditPost {
                title: body.title,
                content: body.content,
            },
        )
        .await?;
    Ok(Json(post))
}

/// `DELETE /posts/{id}`: author-only; the explicit non-read request is
/// the confirmation step, a GET can never destroy anything.
pub async fn remove(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.content.delete_post(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
