//! Catalog product.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A purchasable product.
///
/// Products are seeded externally and are read-only from the API's
/// perspective. `id` is unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    /// Image URL or path relative to the static root.
    pub image: String,
    pub category: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_catalog_json() {
        let json = r#"{
            "id": 1,
            "name": "Trail Mug",
            "price": 14.5,
            "description": "Enamel camping mug",
            "image": "/static/images/mug.jpg",
            "category": "kitchen"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(1450));
        assert_eq!(product.category, "kitchen");
    }

    #[test]
    fn test_product_missing_field_is_rejected() {
        let json = r#"{"id": 1, "name": "Trail Mug", "price": 14.5}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
