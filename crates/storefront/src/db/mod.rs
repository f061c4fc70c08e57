//! Store abstraction for the catalog and cart documents.
//!
//! # Documents
//!
//! Each store is a single JSON array, read and overwritten wholesale:
//!
//! - `products.json` - the catalog (read-only from the API's perspective)
//! - `cart.json` - the shared cart lines
//!
//! # Read policy
//!
//! Every store carries a [`ReadPolicy`]. A document that does not exist yet
//! loads as an empty collection under either policy; the first write creates
//! it. Under [`ReadPolicy::FailOpen`] an unreadable or malformed document also
//! loads as empty. Under [`ReadPolicy::Strict`] that failure propagates. The
//! raw result is
//! always available through `read()`, so callers can tell an empty store from
//! an unreadable one regardless of policy. Write failures are never recovered.
//!
//! # Implementations
//!
//! - [`JsonFileStore`] - pretty-printed JSON on disk, atomic replace on write
//! - [`MemoryStore`] - in-process `Vec`, for tests

pub mod json_file;
pub mod memory;

use std::path::PathBuf;

use async_trait::async_trait;
use minimart_core::{Cart, CartLine, Product};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Errors that can occur in store operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The backing document does not exist.
    #[error("store file not found: {}", path.display())]
    Missing { path: PathBuf },

    /// Reading or writing the backing document failed.
    #[error("store I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing document is not a valid JSON array of the expected records.
    #[error("store file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store cannot be used (e.g. a simulated failure in tests).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// How a store treats a failed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// Treat a missing or unreadable document as an empty collection.
    #[default]
    FailOpen,
    /// Propagate read failures other than a missing document to the caller.
    Strict,
}

impl ReadPolicy {
    /// Apply this policy to the raw result of a read.
    ///
    /// # Errors
    ///
    /// Under `Strict`, returns the original error unchanged unless it is
    /// `RepositoryError::Missing`.
    pub fn apply<T>(
        self,
        result: Result<Vec<T>, RepositoryError>,
        store: &'static str,
    ) -> Result<Vec<T>, RepositoryError> {
        match (self, result) {
            (_, Ok(items)) => Ok(items),
            (_, Err(RepositoryError::Missing { path })) => {
                tracing::debug!(
                    store,
                    path = %path.display(),
                    "Store not created yet, using empty collection"
                );
                Ok(Vec::new())
            }
            (Self::FailOpen, Err(e)) => {
                tracing::warn!(store, error = %e, "Store unreadable, using empty collection");
                Ok(Vec::new())
            }
            (Self::Strict, Err(e)) => Err(e),
        }
    }
}

/// Persistence for the shared cart.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Read the persisted lines without applying the read policy.
    async fn read(&self) -> Result<Vec<CartLine>, RepositoryError>;

    /// Overwrite the persisted lines.
    async fn write(&self, lines: &[CartLine]) -> Result<(), RepositoryError>;

    /// The policy `load()` applies to failed reads.
    fn read_policy(&self) -> ReadPolicy;

    /// Load the cart, applying the read policy.
    ///
    /// # Errors
    ///
    /// Returns the read error only under `ReadPolicy::Strict`.
    async fn load(&self) -> Result<Cart, RepositoryError> {
        let lines = self.read_policy().apply(self.read().await, "cart")?;
        Ok(Cart::from_lines(lines))
    }

    /// Persist the whole cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails.
    async fn save(&self, cart: &Cart) -> Result<(), RepositoryError> {
        self.write(cart.lines()).await
    }
}

/// Read access to the product catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Read the catalog without applying the read policy.
    async fn read(&self) -> Result<Vec<Product>, RepositoryError>;

    /// The policy `load()` applies to failed reads.
    fn read_policy(&self) -> ReadPolicy;

    /// Load the catalog, applying the read policy.
    ///
    /// # Errors
    ///
    /// Returns the read error only under `ReadPolicy::Strict`.
    async fn load(&self) -> Result<Vec<Product>, RepositoryError> {
        self.read_policy().apply(self.read().await, "catalog")
    }
}
