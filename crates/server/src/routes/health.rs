use axum::{extract::State, http::StatusCode};

use crate::errors::ApiError;
use crate::extract::Incoming;
use crate::state::AppState;

/// 200 with an empty body once a probe row is written.
#[utoipa::path(
    get, path = "/healthz", tag = "health",
    responses(
        (status = 200, description = "Database reachable"),
        (status = 400, description = "Query, body or credentials sent"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn check(State(state): State<AppState>, req: Incoming) -> Result<StatusCode, ApiError> {
    state.health.check(&req.envelope).await?;
    Ok(StatusCode::OK)
}
