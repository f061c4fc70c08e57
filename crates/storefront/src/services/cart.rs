//! Cart operations over the shared cart store.
//!
//! Every mutation is a full read-modify-write of the cart document. The
//! service holds a single async mutex for the duration of that cycle, so
//! concurrent requests are applied one after another and none of them is lost.
//! Reads skip the lock; the store's atomic writes mean a reader always sees a
//! complete document.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::instrument;

use minimart_core::{Cart, CartError, Price, Product, ProductId, catalog};

use crate::db::{CartRepository, RepositoryError};

/// Errors from cart operations.
#[derive(Debug, thiserror::Error)]
pub enum CartServiceError {
    /// The requested change violates a cart rule.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The cart store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Totals for the cart, priced against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Sum of quantities across every line, including lines for unknown products.
    pub item_count: u64,
    /// Sum of `line_total` over the priced lines.
    pub subtotal: Price,
    /// Lines whose product exists in the catalog, in cart order.
    pub lines: Vec<CartLineSummary>,
}

/// One priced cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineSummary {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

/// Cart operations with single-writer serialization.
pub struct CartService {
    store: Arc<dyn CartRepository>,
    write_lock: Mutex<()>,
}

impl CartService {
    /// Create a cart service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CartRepository>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the current cart.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Repository` if the store is unreadable and
    /// its read policy is strict.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Cart, CartServiceError> {
        Ok(self.store.load().await?)
    }

    /// Add `quantity` units of a product, accumulating onto an existing line.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidQuantity` if `quantity < 1`
    /// - `CartError::QuantityOverflow` if the line would exceed `u32::MAX`
    /// - `CartServiceError::Repository` if the store fails
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Cart, CartServiceError> {
        self.mutate(|cart| cart.add(product_id, quantity)).await
    }

    /// Set the quantity of a line; zero or below removes it.
    ///
    /// # Errors
    ///
    /// - `CartError::NotInCart` if the product has no line
    /// - `CartError::QuantityOverflow` if `quantity` exceeds `u32::MAX`
    /// - `CartServiceError::Repository` if the store fails
    #[instrument(skip(self))]
    pub async fn set_item_quantity(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Cart, CartServiceError> {
        self.mutate(|cart| cart.set_quantity(product_id, quantity))
            .await
    }

    /// Remove a product's line. Removing an absent product is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Repository` if the store fails.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, product_id: ProductId) -> Result<Cart, CartServiceError> {
        self.mutate(|cart| {
            if !cart.remove(product_id) {
                tracing::debug!(%product_id, "Remove of product not in cart");
            }
            Ok(())
        })
        .await
    }

    /// Empty the cart unconditionally.
    ///
    /// The current document is not read, so this also repairs a corrupt store.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Repository` if the write fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<Cart, CartServiceError> {
        let _guard = self.write_lock.lock().await;
        let cart = Cart::new();
        self.store.save(&cart).await?;
        tracing::info!("Cart cleared");
        Ok(cart)
    }

    /// Price the current cart against `products`.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Repository` if the store is unreadable and
    /// its read policy is strict.
    #[instrument(skip(self, products))]
    pub async fn summary(&self, products: &[Product]) -> Result<CartSummary, CartServiceError> {
        let cart = self.get_cart().await?;
        Ok(summarize(&cart, products))
    }

    /// Run one read-modify-write cycle under the write lock.
    ///
    /// Nothing is persisted if `apply` fails.
    async fn mutate<F>(&self, apply: F) -> Result<Cart, CartServiceError>
    where
        F: FnOnce(&mut Cart) -> Result<(), CartError> + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut cart = self.store.load().await?;
        apply(&mut cart)?;
        self.store.save(&cart).await?;
        tracing::debug!(lines = cart.len(), "Cart saved");
        Ok(cart)
    }
}

/// Price `cart` against `products`, skipping lines with no matching product.
#[must_use]
pub fn summarize(cart: &Cart, products: &[Product]) -> CartSummary {
    let lines: Vec<CartLineSummary> = cart
        .lines()
        .iter()
        .filter_map(|line| {
            let product = catalog::find(products, line.product_id)?;
            Some(CartLineSummary {
                product_id: line.product_id,
                name: product.name.clone(),
                unit_price: product.price,
                quantity: line.quantity,
                line_total: product.price * line.quantity,
            })
        })
        .collect();

    CartSummary {
        item_count: cart.total_quantity(),
        subtotal: lines.iter().map(|l| l.line_total).sum(),
        lines,
    }
}
