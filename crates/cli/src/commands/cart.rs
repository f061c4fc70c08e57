//! Cart inspection and reset.

use std::path::Path;

use tracing::info;

use minimart_core::{CartLine, Product, catalog};
use minimart_storefront::db::{CartRepository, JsonFileStore, ReadPolicy};
use minimart_storefront::services::cart::summarize;

/// Print the cart with product names and the subtotal.
///
/// Lines whose product is no longer in the catalog are listed by id.
///
/// # Errors
///
/// Returns an error if the cart document is unreadable or corrupt. A missing
/// cart is shown as empty; a missing catalog is treated as empty.
#[allow(clippy::print_stdout)]
pub async fn show(
    cart_path: &Path,
    products_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let cart = JsonFileStore::<CartLine>::new(cart_path, ReadPolicy::Strict)
        .load()
        .await?;
    let products = ReadPolicy::FailOpen.apply(
        JsonFileStore::<Product>::new(products_path, ReadPolicy::FailOpen)
            .read_all()
            .await,
        "catalog",
    )?;

    if cart.is_empty() {
        println!("Cart is empty.");
        return Ok(());
    }

    let summary = summarize(&cart, &products);
    for line in &summary.lines {
        println!(
            "{:>4} x {} (#{}) @ {} = {}",
            line.quantity, line.name, line.product_id, line.unit_price, line.line_total
        );
    }

    let unknown = cart.lines().len() - summary.lines.len();
    for line in cart
        .lines()
        .iter()
        .filter(|l| catalog::find(&products, l.product_id).is_none())
    {
        println!("{:>4} x unknown product #{}", line.quantity, line.product_id);
    }

    println!("Items: {}  Subtotal: {}", summary.item_count, summary.subtotal);
    if unknown > 0 {
        println!("({unknown} line(s) reference products missing from the catalog)");
    }
    Ok(())
}

/// Empty the cart document.
///
/// # Errors
///
/// Returns an error if the document cannot be written.
pub async fn clear(cart_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    JsonFileStore::<CartLine>::new(cart_path, ReadPolicy::Strict)
        .write_all(&[])
        .await?;
    info!(path = %cart_path.display(), "Cart cleared");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use minimart_core::ProductId;

    use super::*;

    #[tokio::test]
    async fn test_clear_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        JsonFileStore::<CartLine>::new(&path, ReadPolicy::Strict)
            .write_all(&[CartLine::new(ProductId::new(1), 3)])
            .await
            .unwrap();

        clear(&path).await.unwrap();

        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_show_rejects_corrupt_cart() {
        let dir = tempfile::tempdir().unwrap();
        let cart = dir.path().join("cart.json");
        tokio::fs::write(&cart, "{not json").await.unwrap();

        assert!(show(&cart, &dir.path().join("products.json")).await.is_err());
    }

    #[tokio::test]
    async fn test_show_treats_missing_cart_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let result = show(&dir.path().join("cart.json"), &dir.path().join("products.json")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_show_tolerates_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let cart = dir.path().join("cart.json");
        tokio::fs::write(&cart, r#"[{"productId": 9, "quantity": 1}]"#)
            .await
            .unwrap();

        assert!(show(&cart, &dir.path().join("products.json")).await.is_ok());
    }
}
