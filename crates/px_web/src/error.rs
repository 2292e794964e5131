use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failure surfaced to HTTP callers as `500 {"detail": "<message>"}`.
#[derive(Debug)]
pub struct ApiError(pub String);

impl From<px_core::Error> for ApiError {
    fn from(error: px_core::Error) -> Self {
        tracing::error!("❌ Request failed: {}", error);
        Self(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": self.0 }))).into_response()
    }
}
