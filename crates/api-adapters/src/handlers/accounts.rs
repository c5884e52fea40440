//! Registration, login, and profiles.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use services::{ProfileEdit, Registration};

use super::FeedQuery;
use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::handlers::posts::read_upload;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `POST /auth/register`
pub async fn register(
    State(state): State<ApiState>,
    Json(body): Json<RegisterBody>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let handle = state
        .accounts
        .register(Registration {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": handle }))))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

/// `POST /auth/login`: issues a bearer token.
pub async fn login(
    State(state): State<ApiState>,
    Json(body): Json<LoginBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let (handle, token) = state.accounts.login(&body.username, &body.password).await?;
    Ok(Json(json!({ "user": handle, "token": token })))
}

/// `GET /auth/me`
pub async fn me(user: CurrentUser) -> Json<serde_json::Value> {
    Json(json!({ "user": user.0 }))
}

/// `GET /users/{username}?page=N`: public profile plus the author feed.
///
/// Email stays private; the payload exposes only the username and join
/// date alongside the profile fields.
pub async fn profile(
    State(state): State<ApiState>,
    Path(username): Path<String>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let (user, feed) = state.feed.author(&username, query.page()).await?;
    let (_, profile) = state.accounts.profile(&username).await?;
    Ok(Json(json!({
        "user": { "username": user.username, "joined": user.created_at },
        "profile": profile,
        "feed": feed,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
    pub bio: Option<String>,
    pub location: Option<String>,
}

/// `PATCH /users/me/profile`: owner-only by construction.
pub async fn edit_profile(
    State(state): State<ApiState>,
    user: CurrentUser,
    Json(body): Json<ProfileBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let profile = state
        .accounts
        .update_profile(
            &user.0,
            ProfileEdit {
                bio: body.bio,
                location: body.location,
            },
        )
        .await?;
    Ok(Json(json!({ "profile": profile })))
}

/// `PUT /users/me/avatar`: multipart with an `avatar` image field.
pub async fn set_avatar(
    State(state): State<ApiState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(super::posts::multipart_error)?
    {
        if field.name() == Some("avatar") {
            upload = read_upload(field).await?;
        }
    }
    let upload = upload
        .ok_or_else(|| domains::FieldErrors::single("avatar", "missing file field"))?;
    let profile = state.accounts.set_avatar(&user.0, upload).await?;
    Ok(Json(json!({ "profile": profile })))
}
