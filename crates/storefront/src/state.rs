//! Application state shared across handlers.

use std::sync::Arc;

use minimart_core::{CartLine, Product};

use crate::config::StorefrontConfig;
use crate::db::{CartRepository, CatalogRepository, JsonFileStore};
use crate::services::{CartService, CatalogService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart service inside it owns
/// the single write lock, so every clone serializes through the same writer.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogService,
    cart: CartService,
}

impl AppState {
    /// Create application state over explicit stores.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Product catalog store
    /// * `cart` - Shared cart store
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Arc<dyn CatalogRepository>,
        cart: Arc<dyn CartRepository>,
    ) -> Self {
        let catalog = CatalogService::new(catalog, config.catalog_cache_ttl);
        let cart = CartService::new(cart);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
            }),
        }
    }

    /// Create application state over the JSON files named in `config`.
    #[must_use]
    pub fn from_config(config: StorefrontConfig) -> Self {
        let catalog: JsonFileStore<Product> =
            JsonFileStore::new(&config.products_path, config.read_policy);
        let cart: JsonFileStore<CartLine> =
            JsonFileStore::new(&config.cart_path, config.read_policy);

        Self::new(config, Arc::new(catalog), Arc::new(cart))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }
}
