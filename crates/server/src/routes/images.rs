use axum::extract::{multipart::MultipartRejection, Multipart, Path, State};
use service::image::domain::Image;
use service::validation::{upload::Attachment, Rejection};

use crate::errors::{ApiReply, ApiResult};
use crate::extract::{Envelope, Incoming};
use crate::state::AppState;

/// Drain every part so the orchestrator can judge count, field name and type.
async fn collect_attachments(multipart: Result<Multipart, MultipartRejection>) -> Result<Vec<Attachment>, Rejection> {
    let mut multipart = multipart.map_err(|e| Rejection::Multipart(e.body_text()))?;
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| Rejection::Multipart(e.body_text()))? {
        let field_name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| Rejection::Multipart(e.body_text()))?;
        parts.push(Attachment { field_name, file_name, content_type, bytes });
    }
    Ok(parts)
}

#[utoipa::path(
    post, path = "/v1/product/{product_id}/image", tag = "image",
    params(("product_id" = i32, Path, description = "Product id")),
    request_body(content = crate::openapi::ImageUploadDoc, content_type = "multipart/form-data"),
    security(("basic" = [])),
    responses(
        (status = 201, description = "Image stored", body = crate::openapi::ImageDoc),
        (status = 400, description = "Not exactly one JPEG/PNG file"),
        (status = 403, description = "Caller does not own the product"),
        (status = 404, description = "No such product"),
        (status = 503, description = "Blob or database store unavailable")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Envelope(envelope): Envelope,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Image> {
    let attachments = collect_attachments(multipart).await;
    Ok(ApiReply(state.images.create(&envelope, &product_id, attachments).await?))
}

#[utoipa::path(
    get, path = "/v1/product/{product_id}/image", tag = "image",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Images of the product", body = [crate::openapi::ImageDoc]),
        (status = 404, description = "No such product")
    )
)]
pub async fn list(State(state): State<AppState>, Path(product_id): Path<String>, req: Incoming) -> ApiResult<Vec<Image>> {
    Ok(ApiReply(state.images.list(&req.envelope, &product_id).await?))
}

#[utoipa::path(
    get, path = "/v1/product/{product_id}/image/{image_id}", tag = "image",
    params(
        ("product_id" = i32, Path, description = "Product id"),
        ("image_id" = i32, Path, description = "Image id")
    ),
    responses(
        (status = 200, description = "Image metadata", body = crate::openapi::ImageDoc),
        (status = 404, description = "No such product or image")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path((product_id, image_id)): Path<(String, String)>,
    req: Incoming,
) -> ApiResult<Image> {
    Ok(ApiReply(state.images.get(&req.envelope, &product_id, &image_id).await?))
}

#[utoipa::path(
    delete, path = "/v1/product/{product_id}/image/{image_id}", tag = "image",
    params(
        ("product_id" = i32, Path, description = "Product id"),
        ("image_id" = i32, Path, description = "Image id")
    ),
    security(("basic" = [])),
    responses(
        (status = 204, description = "Blob and record removed"),
        (status = 403, description = "Caller does not own the product"),
        (status = 404, description = "No such product or image"),
        (status = 503, description = "Blob store unavailable; record kept")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path((product_id, image_id)): Path<(String, String)>,
    req: Incoming,
) -> ApiResult<()> {
    Ok(ApiReply(state.images.delete(&req.envelope, &product_id, &image_id).await?))
}
