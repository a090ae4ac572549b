use axum::{routing::get, Router};

pub mod products;
pub mod products_api;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/products", products::router())
        .nest("/api/products", products_api::router())
}
