//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                               - Product listing
//! GET  /health                         - Health check
//!
//! # Products
//! POST /products/{id}/select           - Select product, redirect to detail
//! POST /products/selection/clear       - Clear selection, redirect to listing
//! GET  /products/{id}                  - Product detail with order form
//!
//! # Orders (HTMX fragments)
//! POST /products/{id}/order            - Submit order (form fragment or full page)
//! POST /products/{id}/order/summary    - Order summary fragment
//!
//! # Development only
//! GET  /debug/catalog                  - Catalog state as JSON
//! ```

pub mod debug;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product and order routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/selection/clear", post(products::clear_selection))
        .route("/{id}", get(products::show))
        .route("/{id}/select", post(products::select))
        .route("/{id}/order", post(orders::submit))
        .route("/{id}/order/summary", post(orders::summary))
}

/// Create the debug routes router.
pub fn debug_routes() -> Router<AppState> {
    Router::new().route("/catalog", get(debug::catalog))
}

/// Create the main storefront router.
///
/// Debug routes are only mounted when `debug` is set.
pub fn routes(debug: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/", get(products::index))
        .nest("/products", product_routes());

    if debug {
        router.nest("/debug", debug_routes())
    } else {
        router
    }
}
