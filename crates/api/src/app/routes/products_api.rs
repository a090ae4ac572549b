//! JSON catalog surface: unpaginated list plus record-level CRUD.
//!
//! Bodies carry raw field values (reference ids, not display names); clients
//! needing names join against the browser surface's directory payloads.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockroom_auth::Action;
use stockroom_catalog::{ProductDraft, ProductPatch};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product)
                .put(replace_product)
                .patch(patch_product)
                .delete(delete_product),
        )
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::View) {
        return errors::forbidden(e);
    }

    let products = match services.product_list_all().await {
        Ok(products) => products,
        Err(e) => return errors::store_error_to_response(e),
    };

    (StatusCode::OK, Json(serde_json::json!({ "items": products }))).into_response()
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<ProductDraft>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::Add) {
        return errors::forbidden(e);
    }
    if let Err(invalid) = draft.validate() {
        return errors::validation_failed(&invalid);
    }

    match services.product_insert(draft).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::View) {
        return errors::forbidden(e);
    }
    let id = match errors::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.product_get(id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn replace_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::Change) {
        return errors::forbidden(e);
    }
    let id = match errors::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(invalid) = draft.validate() {
        return errors::validation_failed(&invalid);
    }

    match services.product_update(id, draft).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn patch_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::Change) {
        return errors::forbidden(e);
    }
    let id = match errors::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let current = match services.product_get(id).await {
        Ok(product) => product,
        Err(e) => return errors::store_error_to_response(e),
    };

    let draft = patch.apply_to(&current);
    if let Err(invalid) = draft.validate() {
        return errors::validation_failed(&invalid);
    }

    match services.product_update(id, draft).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::Delete) {
        return errors::forbidden(e);
    }
    let id = match errors::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.product_delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
