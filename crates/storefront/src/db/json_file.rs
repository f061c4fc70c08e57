//! JSON document store backed by a single file.

use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use minimart_core::{CartLine, Product};

use super::{CartRepository, CatalogRepository, ReadPolicy, RepositoryError};

/// A JSON array of `T` persisted as one pretty-printed file.
///
/// Reads parse the whole document. Writes serialize the whole collection to a
/// temporary file in the same directory and rename it over the target, so a
/// concurrent reader sees either the old document or the new one.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    policy: ReadPolicy,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Create a store for the document at `path`.
    ///
    /// The file is not touched until the first read or write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, policy: ReadPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            _records: PhantomData,
        }
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole document.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Missing` if the file does not exist
    /// - `RepositoryError::Io` if it cannot be read
    /// - `RepositoryError::Corrupt` if it is not a JSON array of `T`
    pub async fn read_all(&self) -> Result<Vec<T>, RepositoryError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                RepositoryError::Missing {
                    path: self.path.clone(),
                }
            } else {
                RepositoryError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        serde_json::from_slice(&bytes).map_err(|source| RepositoryError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the whole document with `items`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the directory cannot be created or the
    /// temporary file cannot be written and persisted.
    pub async fn write_all(&self, items: &[T]) -> Result<(), RepositoryError> {
        let bytes = serde_json::to_vec_pretty(items).map_err(|e| RepositoryError::Io {
            path: self.path.clone(),
            source: io::Error::other(e),
        })?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| RepositoryError::Io {
                path: self.path.clone(),
                source: io::Error::other(e),
            })?
            .map_err(|source| RepositoryError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// Write `bytes` to `path` via a synced temporary file and rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    if let Some(permissions) = target_permissions(path)? {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Permissions the replacement document should carry.
///
/// An existing document keeps its mode. A new one gets `0644` on unix rather
/// than the `0600` of a fresh temporary file.
fn target_permissions(path: &Path) -> io::Result<Option<std::fs::Permissions>> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(new_document_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn new_document_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
const fn new_document_permissions() -> Option<std::fs::Permissions> {
    None
}

#[async_trait]
impl CartRepository for JsonFileStore<CartLine> {
    async fn read(&self) -> Result<Vec<CartLine>, RepositoryError> {
        self.read_all().await
    }

    async fn write(&self, lines: &[CartLine]) -> Result<(), RepositoryError> {
        self.write_all(lines).await
    }

    fn read_policy(&self) -> ReadPolicy {
        self.policy
    }
}

#[async_trait]
impl CatalogRepository for JsonFileStore<Product> {
    async fn read(&self) -> Result<Vec<Product>, RepositoryError> {
        self.read_all().await
    }

    fn read_policy(&self) -> ReadPolicy {
        self.policy
    }
}
