use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::{response::error_reply, Outcome, ServiceError};
use thiserror::Error;
use tracing::error;

/// Service failure rendered as `{"error", "code"}` with the mapped status.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self { Self(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = error_reply(&self.0);
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(status = status.as_u16(), code = self.0.code(), error = %self.0, "request failed");
        }
        match body {
            Some(body) => (status, Json(body)).into_response(),
            None => status.into_response(),
        }
    }
}

/// Successful outcome rendered as JSON (200/201) or an empty 204.
pub struct ApiReply<T>(pub Outcome<T>);

impl<T: Serialize> IntoResponse for ApiReply<T> {
    fn into_response(self) -> Response {
        match self.0 {
            Outcome::Ok(v) => (StatusCode::OK, Json(v)).into_response(),
            Outcome::Created(v) => (StatusCode::CREATED, Json(v)).into_response(),
            Outcome::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

pub type ApiResult<T> = Result<ApiReply<T>, ApiError>;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
