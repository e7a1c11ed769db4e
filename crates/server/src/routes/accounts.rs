use axum::extract::{Path, State};
use service::account::domain::AccountView;

use crate::errors::{ApiReply, ApiResult};
use crate::extract::Incoming;
use crate::state::AppState;

#[utoipa::path(
    post, path = "/v1/user", tag = "account",
    request_body = crate::openapi::NewAccountDoc,
    responses(
        (status = 201, description = "Account created", body = crate::openapi::AccountDoc),
        (status = 400, description = "Invalid payload or username taken"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn create(State(state): State<AppState>, req: Incoming) -> ApiResult<AccountView> {
    Ok(ApiReply(state.accounts.create(&req.envelope, &req.body).await?))
}

#[utoipa::path(
    get, path = "/v1/user/{user_id}", tag = "account",
    params(("user_id" = i32, Path, description = "Account id")),
    security(("basic" = [])),
    responses(
        (status = 200, description = "Own account", body = crate::openapi::AccountDoc),
        (status = 401, description = "Missing or wrong credentials"),
        (status = 403, description = "Not the caller's account")
    )
)]
pub async fn get(State(state): State<AppState>, Path(user_id): Path<String>, req: Incoming) -> ApiResult<AccountView> {
    Ok(ApiReply(state.accounts.get(&req.envelope, &user_id).await?))
}

#[utoipa::path(
    put, path = "/v1/user/{user_id}", tag = "account",
    params(("user_id" = i32, Path, description = "Account id")),
    request_body = crate::openapi::AccountUpdateDoc,
    security(("basic" = [])),
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or wrong credentials"),
        (status = 403, description = "Not the caller's account")
    )
)]
pub async fn update(State(state): State<AppState>, Path(user_id): Path<String>, req: Incoming) -> ApiResult<()> {
    Ok(ApiReply(state.accounts.update(&req.envelope, &user_id, &req.body).await?))
}
