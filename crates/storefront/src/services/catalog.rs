//! Catalog lookups with a short-lived cache.
//!
//! The catalog is read-only from the API's perspective, so a successful load
//! is cached for `catalog_cache_ttl`. A fail-open fallback (empty catalog) is
//! never cached; the next request reads the store again.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::instrument;

use minimart_core::{Product, ProductId, catalog};

use crate::db::{CatalogRepository, RepositoryError};

/// Product lookups over a [`CatalogRepository`].
pub struct CatalogService {
    store: Arc<dyn CatalogRepository>,
    cache: Option<Cache<(), Arc<Vec<Product>>>>,
}

impl CatalogService {
    /// Create a catalog service.
    ///
    /// A zero `cache_ttl` disables caching; every lookup reads the store.
    #[must_use]
    pub fn new(store: Arc<dyn CatalogRepository>, cache_ttl: Duration) -> Self {
        let cache = (!cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(cache_ttl)
                .build()
        });
        Self { store, cache }
    }

    /// All products in catalog order, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unreadable and its read policy
    /// is strict.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products().await?;
        Ok(match category {
            Some(category) => catalog::in_category(&products, category)
                .cloned()
                .collect(),
            None => products.as_ref().clone(),
        })
    }

    /// Get a product by id.
    ///
    /// Returns `Ok(None)` if no product has that id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unreadable and its read policy
    /// is strict.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products().await?;
        Ok(catalog::find(&products, id).cloned())
    }

    /// Distinct categories in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unreadable and its read policy
    /// is strict.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let products = self.products().await?;
        Ok(catalog::categories(&products))
    }

    /// Read the catalog, bypassing both the cache and the read policy.
    ///
    /// Used by the readiness probe.
    ///
    /// # Errors
    ///
    /// Returns any store read error.
    pub async fn check(&self) -> Result<usize, RepositoryError> {
        Ok(self.store.read().await?.len())
    }

    /// The full catalog, from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unreadable and its read policy
    /// is strict.
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, RepositoryError> {
        let Some(cache) = &self.cache else {
            return Ok(Arc::new(self.store.load().await?));
        };

        if let Some(products) = cache.get(&()).await {
            return Ok(products);
        }

        match self.store.read().await {
            Ok(products) => {
                let products = Arc::new(products);
                cache.insert((), Arc::clone(&products)).await;
                tracing::debug!(count = products.len(), "Catalog cached");
                Ok(products)
            }
            Err(e) => {
                let products = self.store.read_policy().apply(Err(e), "catalog")?;
                Ok(Arc::new(products))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use minimart_core::Price;
    use tempfile::TempDir;

    use super::*;
    use crate::db::{JsonFileStore, MemoryStore, ReadPolicy};

    fn product(id: i32, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_cents(999),
            description: "A product".to_string(),
            image: format!("/static/images/{id}.jpg"),
            category: category.to_string(),
        }
    }

    fn service(products: Vec<Product>) -> CatalogService {
        CatalogService::new(
            Arc::new(MemoryStore::new(products, ReadPolicy::FailOpen)),
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn test_list_all_and_by_category() {
        let service = service(vec![product(1, "tea"), product(2, "mugs"), product(3, "tea")]);

        assert_eq!(service.list_products(None).await.unwrap().len(), 3);
        let tea = service.list_products(Some("tea")).await.unwrap();
        assert_eq!(
            tea.iter().map(|p| p.id.as_i32()).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert!(service.list_products(Some("nope")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_product() {
        let service = service(vec![product(1, "tea"), product(2, "mugs")]);
        let found = service.get_product(ProductId::new(2)).await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(ProductId::new(2)));
        assert!(service.get_product(ProductId::new(5)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_catalog_fails_open() {
        let service = CatalogService::new(
            Arc::new(MemoryStore::<Product>::unreadable(ReadPolicy::FailOpen)),
            Duration::from_secs(30),
        );
        assert!(service.list_products(None).await.unwrap().is_empty());
        assert!(service.check().await.is_err());
    }

    #[tokio::test]
    async fn test_unreadable_catalog_strict() {
        let service = CatalogService::new(
            Arc::new(MemoryStore::<Product>::unreadable(ReadPolicy::Strict)),
            Duration::ZERO,
        );
        assert!(service.list_products(None).await.is_err());
    }

    #[tokio::test]
    async fn test_fallback_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        let store: JsonFileStore<Product> = JsonFileStore::new(&path, ReadPolicy::FailOpen);
        let service = CatalogService::new(Arc::new(store), Duration::from_secs(60));

        // Missing file: empty, and not cached.
        assert!(service.list_products(None).await.unwrap().is_empty());

        let seeded: JsonFileStore<Product> = JsonFileStore::new(&path, ReadPolicy::Strict);
        seeded.write_all(&[product(1, "tea")]).await.unwrap();
        assert_eq!(service.list_products(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_successful_load_is_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        let writer: JsonFileStore<Product> = JsonFileStore::new(&path, ReadPolicy::Strict);
        writer.write_all(&[product(1, "tea")]).await.unwrap();

        let service = CatalogService::new(
            Arc::new(JsonFileStore::<Product>::new(&path, ReadPolicy::Strict)),
            Duration::from_secs(60),
        );
        assert_eq!(service.list_products(None).await.unwrap().len(), 1);

        writer
            .write_all(&[product(1, "tea"), product(2, "tea")])
            .await
            .unwrap();
        assert_eq!(service.list_products(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_categories() {
        let service = service(vec![product(1, "tea"), product(2, "mugs"), product(3, "tea")]);
        assert_eq!(service.categories().await.unwrap(), vec!["tea", "mugs"]);
    }
}
