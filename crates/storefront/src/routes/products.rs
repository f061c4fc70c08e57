//! Product route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use minimart_core::{Product, ProductId};

use crate::error::{AppError, Result};
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Exact category to filter by.
    pub category: Option<String>,
}

/// List products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let products = state.catalog().list_products(category).await?;
    Ok(Json(products))
}

/// Get a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    state
        .catalog()
        .get_product(id)
        .await?
        .map(Json)
        .ok_or_else(AppError::product_not_found)
}

/// List distinct product categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.catalog().categories().await?))
}
