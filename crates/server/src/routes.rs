pub mod accounts;
pub mod health;
pub mod images;
pub mod products;

use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::errors::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;
use service::ServiceError;

/// HEAD is answered explicitly; axum would otherwise serve it from the GET handler.
async fn method_not_allowed() -> ApiError {
    ApiError(ServiceError::MethodNotSupported)
}

async fn not_found() -> ApiError {
    ApiError(ServiceError::NotFound("route"))
}

async fn metrics() -> (StatusCode, String) {
    common::metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let start = Instant::now();
    let resp = next.run(req).await;
    common::metrics::observe_request(method.as_str(), resp.status().as_u16(), start.elapsed().as_secs_f64());
    resp
}

/// Build the full application router
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let api = Router::new()
        .route("/healthz", get(health::check).head(method_not_allowed))
        .route("/v1/user", post(accounts::create))
        .route(
            "/v1/user/:user_id",
            get(accounts::get).put(accounts::update).head(method_not_allowed),
        )
        .route(
            "/v1/product",
            get(products::list).post(products::create).head(method_not_allowed),
        )
        .route(
            "/v1/product/:product_id",
            get(products::get)
                .put(products::replace)
                .patch(products::patch)
                .delete(products::delete)
                .head(method_not_allowed),
        )
        .route(
            "/v1/product/:product_id/image",
            get(images::list).post(images::create).head(method_not_allowed),
        )
        .route(
            "/v1/product/:product_id/image/:image_id",
            get(images::get).delete(images::delete).head(method_not_allowed),
        );

    let ops = Router::new()
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    api.merge(ops)
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(track_metrics))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(header::PRAGMA, HeaderValue::from_static("no-cache")))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
