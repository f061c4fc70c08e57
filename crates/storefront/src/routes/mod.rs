//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Liveness check
//! GET    /health/ready             - Readiness check (catalog readable)
//!
//! # Catalog
//! GET    /api/products             - Product listing (?category= filter)
//! GET    /api/products/{id}        - Product detail
//! GET    /api/categories           - Distinct categories
//!
//! # Cart (shared, JSON)
//! GET    /api/cart                 - Cart lines
//! POST   /api/cart                 - Add item {productId, quantity}
//! DELETE /api/cart                 - Clear cart
//! GET    /api/cart/summary         - Item count, priced lines, subtotal
//! PUT    /api/cart/{product_id}    - Set quantity {quantity}; <= 0 removes
//! DELETE /api/cart/{product_id}    - Remove line
//! ```

pub mod cart;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, put},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add).delete(cart::clear))
        .route("/summary", get(cart::summary))
        .route("/{product_id}", put(cart::update).delete(cart::remove))
}

/// Create all API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .route("/categories", get(products::categories))
        .nest("/cart", cart_routes())
}

/// Create all routes for the storefront.
///
/// A known path hit with an unsupported method gets a JSON `405`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .method_not_allowed_fallback(method_not_allowed)
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
