use axum::extract::{Path, State};
use service::product::domain::Product;

use crate::errors::{ApiReply, ApiResult};
use crate::extract::Incoming;
use crate::state::AppState;

#[utoipa::path(
    post, path = "/v1/product", tag = "product",
    request_body = crate::openapi::ProductDoc,
    security(("basic" = [])),
    responses(
        (status = 201, description = "Product created", body = crate::openapi::ProductRecordDoc),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or wrong credentials")
    )
)]
pub async fn create(State(state): State<AppState>, req: Incoming) -> ApiResult<Product> {
    Ok(ApiReply(state.products.create(&req.envelope, &req.body).await?))
}

#[utoipa::path(
    get, path = "/v1/product", tag = "product",
    responses((status = 200, description = "All products", body = [crate::openapi::ProductRecordDoc]))
)]
pub async fn list(State(state): State<AppState>, req: Incoming) -> ApiResult<Vec<Product>> {
    Ok(ApiReply(state.products.list(&req.envelope).await?))
}

#[utoipa::path(
    get, path = "/v1/product/{product_id}", tag = "product",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = crate::openapi::ProductRecordDoc),
        (status = 404, description = "No such product")
    )
)]
pub async fn get(State(state): State<AppState>, Path(product_id): Path<String>, req: Incoming) -> ApiResult<Product> {
    Ok(ApiReply(state.products.get(&req.envelope, &product_id).await?))
}

#[utoipa::path(
    put, path = "/v1/product/{product_id}", tag = "product",
    params(("product_id" = i32, Path, description = "Product id")),
    request_body = crate::openapi::ProductDoc,
    security(("basic" = [])),
    responses(
        (status = 204, description = "Replaced"),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller does not own the product"),
        (status = 404, description = "No such product")
    )
)]
pub async fn replace(State(state): State<AppState>, Path(product_id): Path<String>, req: Incoming) -> ApiResult<()> {
    Ok(ApiReply(state.products.replace(&req.envelope, &product_id, &req.body).await?))
}

#[utoipa::path(
    patch, path = "/v1/product/{product_id}", tag = "product",
    params(("product_id" = i32, Path, description = "Product id")),
    request_body = crate::openapi::ProductPatchDoc,
    security(("basic" = [])),
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller does not own the product"),
        (status = 404, description = "No such product")
    )
)]
pub async fn patch(State(state): State<AppState>, Path(product_id): Path<String>, req: Incoming) -> ApiResult<()> {
    Ok(ApiReply(state.products.patch(&req.envelope, &product_id, &req.body).await?))
}

#[utoipa::path(
    delete, path = "/v1/product/{product_id}", tag = "product",
    params(("product_id" = i32, Path, description = "Product id")),
    security(("basic" = [])),
    responses(
        (status = 204, description = "Deleted with its images"),
        (status = 403, description = "Caller does not own the product"),
        (status = 404, description = "No such product")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(product_id): Path<String>, req: Incoming) -> ApiResult<()> {
    Ok(ApiReply(state.products.delete(&req.envelope, &product_id).await?))
}
