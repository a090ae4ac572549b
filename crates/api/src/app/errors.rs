use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_auth::AuthzError;
use stockroom_core::{ProductId, ValidationErrors};
use stockroom_store::StoreError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound(id) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("product {id} not found"))
        }
        // Referential failures read as form errors on the offending field.
        StoreError::UnknownCategory(id) => {
            let mut errors = ValidationErrors::new();
            errors.add("category", format!("select a valid category: {id} does not exist"));
            validation_failed(&errors)
        }
        StoreError::UnknownBrand(id) => {
            let mut errors = ValidationErrors::new();
            errors.add("brand", format!("select a valid brand: {id} does not exist"));
            validation_failed(&errors)
        }
        StoreError::Backend(detail) => {
            tracing::error!("storage backend failure: {detail}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "storage backend failure",
            )
        }
    }
}

pub fn validation_failed(errors: &ValidationErrors) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "validation_failed",
            "message": errors.to_string(),
            "fields": errors,
        })),
    )
        .into_response()
}

pub fn forbidden(err: AuthzError) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}

pub fn metrics_error(err: anyhow::Error) -> axum::response::Response {
    tracing::error!("metrics provider failure: {err:#}");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "metrics_error",
        "metrics provider failure",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_product_id(s: &str) -> Result<ProductId, axum::response::Response> {
    s.parse().map_err(|_| {
        json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
    })
}
