use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use catalog_products::ProductInput;

use crate::app::dto::ApiResponse;
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_products)
                .post(create_product)
                .put(missing_product_id)
                .delete(missing_product_id),
        )
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn parse_id(raw: &str) -> Result<i64, axum::response::Response> {
    raw.trim().parse::<i64>().map_err(|_| {
        tracing::warn!(path_id = raw, "invalid product id in path");
        errors::json_error(StatusCode::BAD_REQUEST, "invalid product id")
    })
}

fn parse_body(body: &Bytes) -> Result<ProductInput, axum::response::Response> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(errors::json_error(StatusCode::BAD_REQUEST, "request body is empty"));
    }
    serde_json::from_slice::<ProductInput>(body).map_err(|e| {
        tracing::warn!(error = %e, "malformed product payload");
        errors::json_error(StatusCode::BAD_REQUEST, "invalid request data")
    })
}

/// `PUT`/`DELETE` on the collection: the id segment is mandatory.
pub async fn missing_product_id() -> axum::response::Response {
    tracing::warn!("product id missing from request path");
    errors::json_error(StatusCode::BAD_REQUEST, "product id is required")
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.products.get_all_products() {
        Ok(products) => (
            StatusCode::OK,
            Json(ApiResponse::with_data("products listed successfully", products)),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    let input = match parse_body(&body) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.products.create_product(&input) {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::with_data("product created successfully", created)),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.products.get_product_by_id(id) {
        Ok(product) => (
            StatusCode::OK,
            Json(ApiResponse::with_data("product found", product)),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Bytes,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let input = match parse_body(&body) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.products.update_product(id, &input) {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok("product updated successfully")),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.products.delete_product(id) {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok("product deleted successfully")),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
