//! Browser-facing catalog surface: filterable listing with metric cards,
//! form-driven create/update/delete, and the spreadsheet export.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Form, Json, Router,
};

use stockroom_auth::Action;
use stockroom_catalog::{Brand, Category, Product};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/new", get(new_product_form).post(create_product))
        .route("/export", get(export_products))
        .route("/:id", get(get_product))
        .route("/:id/edit", get(edit_product_form).post(update_product))
        .route("/:id/delete", get(delete_product_confirm).post(delete_product))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::ProductListQuery>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::View) {
        return errors::forbidden(e);
    }

    let page = match services.product_query(&query.filter(), query.page()).await {
        Ok(page) => page,
        Err(e) => return errors::store_error_to_response(e),
    };
    let (categories, brands) = match directory(&services).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // Metric cards summarise the whole catalog, never the active filter.
    let product_metrics = match services.product_metrics().await {
        Ok(m) => m,
        Err(e) => return errors::metrics_error(e),
    };
    let sales_metrics = match services.sales_metrics().await {
        Ok(m) => m,
        Err(e) => return errors::metrics_error(e),
    };

    (
        StatusCode::OK,
        Json(dto::listing_body(
            &page,
            &categories,
            &brands,
            &product_metrics,
            &sales_metrics,
        )),
    )
        .into_response()
}

pub async fn new_product_form(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::Add) {
        return errors::forbidden(e);
    }

    let (categories, brands) = match directory(&services).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "categories": categories,
            "brands": brands,
        })),
    )
        .into_response()
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Form(form): Form<dto::ProductForm>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::Add) {
        return errors::forbidden(e);
    }

    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(invalid) => return errors::validation_failed(&invalid),
    };

    let product = match services.product_insert(draft).await {
        Ok(product) => product,
        Err(e) => return errors::store_error_to_response(e),
    };

    let body = match resolved_product_body(&services, &product).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    (StatusCode::CREATED, Json(body)).into_response()
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

    let product = match services.product_get(id).await {
        Ok(product) => product,
        Err(e) => return errors::store_error_to_response(e),
    };

    let body = match resolved_product_body(&services, &product).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub async fn edit_product_form(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::Change) {
        return errors::forbidden(e);
    }
    let id = match errors::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let product = match services.product_get(id).await {
        Ok(product) => product,
        Err(e) => return errors::store_error_to_response(e),
    };
    let (categories, brands) = match directory(&services).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product_body = match resolved_product_body(&services, &product).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "product": product_body,
            "categories": categories,
            "brands": brands,
        })),
    )
        .into_response()
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Form(form): Form<dto::ProductForm>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::Change) {
        return errors::forbidden(e);
    }
    let id = match errors::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(invalid) => return errors::validation_failed(&invalid),
    };

    let product = match services.product_update(id, draft).await {
        Ok(product) => product,
        Err(e) => return errors::store_error_to_response(e),
    };

    let body = match resolved_product_body(&services, &product).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub async fn delete_product_confirm(
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

    // The confirmation screen shows the product about to be removed.
    let product = match services.product_get(id).await {
        Ok(product) => product,
        Err(e) => return errors::store_error_to_response(e),
    };

    let body = match resolved_product_body(&services, &product).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    (StatusCode::OK, Json(body)).into_response()
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

pub async fn export_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Action::View) {
        return errors::forbidden(e);
    }

    // Export covers the entire catalog; listing filters never apply here.
    let products = match services.product_list_all().await {
        Ok(products) => products,
        Err(e) => return errors::store_error_to_response(e),
    };
    let (categories, brands) = match directory(&services).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // Workbook construction is CPU-bound; keep it off the async workers.
    let built = tokio::task::spawn_blocking(move || {
        stockroom_export::write_catalog(&products, &categories, &brands)
    })
    .await;

    let bytes = match built {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            tracing::error!("spreadsheet export failed: {e}");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "export_failed",
                "failed to build spreadsheet",
            );
        }
        Err(e) => {
            tracing::error!("spreadsheet export task failed: {e}");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "export_failed",
                "failed to build spreadsheet",
            );
        }
    };

    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            (header::CONTENT_DISPOSITION, "attachment; filename=products.xlsx"),
        ],
        bytes,
    )
        .into_response()
}

async fn directory(
    services: &AppServices,
) -> Result<(Vec<Category>, Vec<Brand>), axum::response::Response> {
    let categories = services
        .categories()
        .await
        .map_err(errors::store_error_to_response)?;
    let brands = services
        .brands()
        .await
        .map_err(errors::store_error_to_response)?;
    Ok((categories, brands))
}

/// Product JSON with its category/brand display names looked up.
async fn resolved_product_body(
    services: &AppServices,
    product: &Product,
) -> Result<serde_json::Value, axum::response::Response> {
    let category = match product.category {
        Some(id) => services
            .category(id)
            .await
            .map_err(errors::store_error_to_response)?,
        None => None,
    };
    let brand = match product.brand {
        Some(id) => services
            .brand(id)
            .await
            .map_err(errors::store_error_to_response)?,
        None => None,
    };

    Ok(dto::product_body(
        product,
        category.as_ref().map(|c| c.name.as_str()),
        brand.as_ref().map(|b| b.name.as_str()),
    ))
}
