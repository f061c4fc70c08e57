//! Lookups and consistency checks over a product list.

use std::collections::HashSet;

use super::id::ProductId;
use super::product::Product;

/// A problem found in a catalog document.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// Two or more products share an id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    /// A product has a blank name.
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),

    /// A product has a blank category.
    #[error("product {0} has an empty category")]
    EmptyCategory(ProductId),
}

/// Find a product by id.
#[must_use]
pub fn find(products: &[Product], id: ProductId) -> Option<&Product> {
    products.iter().find(|p| p.id == id)
}

/// Products in the given category (exact match), in catalog order.
pub fn in_category<'a>(
    products: &'a [Product],
    category: &'a str,
) -> impl Iterator<Item = &'a Product> + 'a {
    products.iter().filter(move |p| p.category == category)
}

/// Distinct categories in order of first appearance.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter(|p| seen.insert(p.category.as_str()))
        .map(|p| p.category.clone())
        .collect()
}

/// Check a catalog for duplicate ids and blank fields.
///
/// Returns every issue found; an empty vector means the catalog is valid.
#[must_use]
pub fn validate(products: &[Product]) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for product in products {
        if !seen.insert(product.id) && reported.insert(product.id) {
            issues.push(CatalogIssue::DuplicateId(product.id));
        }
        if product.name.trim().is_empty() {
            issues.push(CatalogIssue::EmptyName(product.id));
        }
        if product.category.trim().is_empty() {
            issues.push(CatalogIssue::EmptyCategory(product.id));
        }
    }

    issues
}
