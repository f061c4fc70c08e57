//! Cart route handlers.
//!
//! There is one cart shared by every client. Each mutating handler returns the
//! full cart after the change so the client can re-render from the response.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use minimart_core::{Cart, ProductId};

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::services::CartSummary;
use crate::state::AppState;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Update cart line request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i64,
}

/// Get the cart lines.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<Cart>> {
    Ok(Json(state.cart().get_cart().await?))
}

/// Add an item, accumulating onto an existing line.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AddToCartRequest>,
) -> Result<Json<Cart>> {
    let cart = state.cart().add_item(body.product_id, body.quantity).await?;
    Ok(Json(cart))
}

/// Set a line's quantity; zero or below removes the line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<ProductId>,
    ApiJson(body): ApiJson<UpdateCartRequest>,
) -> Result<Json<Cart>> {
    let cart = state
        .cart()
        .set_item_quantity(product_id, body.quantity)
        .await?;
    Ok(Json(cart))
}

/// Remove a line. Succeeds even if the product is not in the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<Json<Cart>> {
    Ok(Json(state.cart().remove_item(product_id).await?))
}

/// Remove every line.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<Cart>> {
    Ok(Json(state.cart().clear_cart().await?))
}

/// Item count, priced lines, and subtotal.
#[instrument(skip(state))]
pub async fn summary(State(state): State<AppState>) -> Result<Json<CartSummary>> {
    let products = state.catalog().products().await?;
    Ok(Json(state.cart().summary(&products).await?))
}
