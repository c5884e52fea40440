//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use domains::{Error, UserHandle};

use crate::error::ApiError;
use crate::state::ApiState;

/// The authenticated caller, resolved from the `Authorization: Bearer`
/// header. Handlers that take this extractor reject unauthenticated
/// requests before any of their own logic runs.
pub struct CurrentUser(pub UserHandle);

impl FromRequestParts<ApiState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError(Error::Unauthenticated))?;
        let handle = state.sessions.verify(token)?;
        Ok(CurrentUser(handle))
    }
}

/// Like [`CurrentUser`] but tolerant: no header means no user, while a
/// present-but-invalid token is still rejected.
pub struct MaybeUser(pub Option<UserHandle>);

impl FromRequestParts<ApiState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            None => Ok(MaybeUser(None)),
            Some(token) => Ok(MaybeUser(Some(state.sessions.verify(token)?))),
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
