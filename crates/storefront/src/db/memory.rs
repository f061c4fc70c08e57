//! In-memory store for tests and ephemeral runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use minimart_core::{CartLine, Product};

use super::{CartRepository, CatalogRepository, ReadPolicy, RepositoryError};

/// A store that keeps its collection in memory.
///
/// An [`unreadable`](Self::unreadable) store fails every read and write, which
/// lets tests exercise both read policies without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    items: RwLock<Vec<T>>,
    policy: ReadPolicy,
    unreadable: bool,
}

impl<T: Clone + Send + Sync> MemoryStore<T> {
    /// Create a store holding `items`.
    #[must_use]
    pub fn new(items: Vec<T>, policy: ReadPolicy) -> Self {
        Self {
            items: RwLock::new(items),
            policy,
            unreadable: false,
        }
    }

    /// Create a store whose every operation fails with `RepositoryError::Unavailable`.
    #[must_use]
    pub fn unreadable(policy: ReadPolicy) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            policy,
            unreadable: true,
        }
    }

    async fn snapshot(&self) -> Result<Vec<T>, RepositoryError> {
        if self.unreadable {
            return Err(RepositoryError::Unavailable(
                "memory store marked unreadable".to_string(),
            ));
        }
        Ok(self.items.read().await.clone())
    }

    async fn replace(&self, items: &[T]) -> Result<(), RepositoryError> {
        if self.unreadable {
            return Err(RepositoryError::Unavailable(
                "memory store marked unreadable".to_string(),
            ));
        }
        *self.items.write().await = items.to_vec();
        Ok(())
    }
}

#[async_trait]
impl CartRepository for MemoryStore<CartLine> {
    async fn read(&self) -> Result<Vec<CartLine>, RepositoryError> {
        self.snapshot().await
    }

    async fn write(&self, lines: &[CartLine]) -> Result<(), RepositoryError> {
        self.replace(lines).await
    }

    fn read_policy(&self) -> ReadPolicy {
        self.policy
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore<Product> {
    async fn read(&self) -> Result<Vec<Product>, RepositoryError> {
        self.snapshot().await
    }

    fn read_policy(&self) -> ReadPolicy {
        self.policy
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use minimart_core::{Cart, ProductId};

    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new(Vec::new(), ReadPolicy::Strict);
        let mut cart = Cart::new();
        cart.add(ProductId::new(4), 2).unwrap();

        store.save(&cart).await.unwrap();
        assert_eq!(store.load().await.unwrap(), cart);
    }

    #[tokio::test]
    async fn test_unreadable_store_respects_policy() {
        let lenient: MemoryStore<CartLine> = MemoryStore::unreadable(ReadPolicy::FailOpen);
        assert!(lenient.load().await.unwrap().is_empty());
        assert!(lenient.read().await.is_err());

        let strict: MemoryStore<CartLine> = MemoryStore::unreadable(ReadPolicy::Strict);
        assert!(matches!(
            strict.load().await,
            Err(RepositoryError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_store_fails_writes_under_either_policy() {
        let store: MemoryStore<CartLine> = MemoryStore::unreadable(ReadPolicy::FailOpen);
        assert!(store.save(&Cart::new()).await.is_err());
    }
}
