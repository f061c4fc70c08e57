//! Catalog import and validation.
//!
//! The catalog is authored as YAML (easier to edit by hand) and imported into
//! the JSON document the storefront serves. Both commands refuse catalogs with
//! duplicate ids or blank names, since the storefront would silently serve
//! only the first product for a duplicated id.

use std::path::Path;

use tracing::{error, info};

use minimart_core::{Product, catalog};
use minimart_storefront::db::{JsonFileStore, ReadPolicy};

/// Import a YAML product list and write it as the JSON catalog.
///
/// # Errors
///
/// Returns an error if the YAML cannot be read or parsed, the catalog fails
/// validation, or the JSON document cannot be written.
pub async fn import(file: &Path, out: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    info!(path = %file.display(), "Loading catalog from YAML");

    let content = tokio::fs::read_to_string(file).await?;
    let products: Vec<Product> = serde_yaml::from_str(&content)?;

    info!(products = products.len(), "Parsed catalog");
    ensure_valid(&products)?;

    let store = JsonFileStore::<Product>::new(out, ReadPolicy::Strict);
    store.write_all(&products).await?;

    info!(path = %out.display(), products = products.len(), "Catalog written");
    Ok(products.len())
}

/// Validate an existing JSON catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or has any issues.
pub async fn check(path: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let store = JsonFileStore::<Product>::new(path, ReadPolicy::Strict);
    let products = store.read_all().await?;

    ensure_valid(&products)?;

    let categories = catalog::categories(&products);
    info!(
        path = %path.display(),
        products = products.len(),
        categories = categories.len(),
        "Catalog is valid"
    );
    Ok(products.len())
}

fn ensure_valid(products: &[Product]) -> Result<(), Box<dyn std::error::Error>> {
    let issues = catalog::validate(products);
    if issues.is_empty() {
        return Ok(());
    }

    error!("Catalog validation failed:");
    for issue in &issues {
        error!("  - {issue}");
    }
    Err(format!("{} validation errors found", issues.len()).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const YAML: &str = "\
- id: 1
  name: Enamel Trail Mug
  price: 14.5
  description: A mug.
  image: https://images.example.com/mug.jpg
  category: kitchen
- id: 2
  name: Canvas Tote
  price: 18
  description: A tote.
  image: https://images.example.com/tote.jpg
  category: bags
";

    #[tokio::test]
    async fn test_import_writes_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("catalog.yaml");
        let out = dir.path().join("data").join("products.json");
        tokio::fs::write(&yaml, YAML).await.unwrap();

        assert_eq!(import(&yaml, &out).await.unwrap(), 2);

        let written = JsonFileStore::<Product>::new(&out, ReadPolicy::Strict)
            .read_all()
            .await
            .unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[1].name, "Canvas Tote");
        assert_eq!(check(&out).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_import_rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("catalog.yaml");
        let out = dir.path().join("products.json");
        tokio::fs::write(&yaml, YAML.replace("id: 2", "id: 1"))
            .await
            .unwrap();

        assert!(import(&yaml, &out).await.is_err());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_check_missing_catalog_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check(&dir.path().join("products.json")).await.is_err());
    }
}
