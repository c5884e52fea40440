//! Maps the domain error taxonomy onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::Error;
use serde_json::json;

/// Wrapper so domain errors can travel through axum's `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub Error);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            Error::NotFound(kind, key) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{kind} not found: {key}") }),
            ),
            Error::Forbidden(reason) => {
                // Security-relevant: somebody tried to mutate what they
                // don't own (or lacked a required role).
                tracing::warn!(reason, "request forbidden");
                (StatusCode::FORBIDDEN, json!({ "error": reason }))
            }
            Error::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "authentication required" }),
            ),
            Error::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "validation failed", "fields": fields.errors }),
            ),
            Error::Conflict(message) => (StatusCode::CONFLICT, json!({ "error": message })),
            Error::Internal(source) => {
                tracing::error!(error = %source, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
