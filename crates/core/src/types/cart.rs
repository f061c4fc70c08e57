//! Shopping cart lines and the pure transformations applied to them.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s. Order reflects when each
//! product was first added. Two invariants hold for every `Cart` value:
//!
//! - at most one line per [`ProductId`]
//! - every line has a quantity of at least 1
//!
//! [`Cart::from_lines`] restores both invariants for documents read from disk,
//! and every mutating method preserves them.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Errors that can occur when mutating a [`Cart`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The product has no line in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// An add was requested with a quantity below 1.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(i64),

    /// The resulting quantity does not fit in a cart line.
    #[error("quantity for product {0} exceeds the maximum of {max}", max = u32::MAX)]
    QuantityOverflow(ProductId),
}

/// One product-id/quantity pair in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartLine {
    /// Create a new cart line.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// The shopping cart: an ordered sequence of [`CartLine`]s.
///
/// Serializes as a bare JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from persisted lines, restoring the cart invariants.
    ///
    /// Duplicate lines for the same product are merged into the first
    /// occurrence (quantities summed, saturating at `u32::MAX`) and
    /// zero-quantity lines are dropped. A well-formed document passes through
    /// unchanged, so `from_lines(cart.lines().to_vec()) == cart`.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut merged: Vec<CartLine> = Vec::new();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            match merged.iter_mut().find(|l| l.product_id == line.product_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => merged.push(line),
            }
        }
        Self { lines: merged }
    }

    /// The cart lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consume the cart and return its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Get the line for a product, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Returns `true` if the product has a line in the cart.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.line(product_id).is_some()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Add `quantity` units of a product.
    ///
    /// Accumulates onto the existing line, or appends a new line at the end.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidQuantity` if `quantity < 1` (the cart is unchanged)
    /// - `CartError::QuantityOverflow` if the resulting quantity exceeds `u32::MAX`
    pub fn add(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let quantity =
            u32::try_from(quantity).map_err(|_| CartError::QuantityOverflow(product_id))?;

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::QuantityOverflow(product_id))?;
            }
            None => self.lines.push(CartLine::new(product_id, quantity)),
        }
        Ok(())
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero or below removes the line. The line keeps its
    /// position when updated.
    ///
    /// # Errors
    ///
    /// - `CartError::NotInCart` if the product has no line (the cart is unchanged)
    /// - `CartError::QuantityOverflow` if `quantity` exceeds `u32::MAX`
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        let index = self
            .lines
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        if quantity <= 0 {
            self.lines.remove(index);
            return Ok(());
        }

        let quantity =
            u32::try_from(quantity).map_err(|_| CartError::QuantityOverflow(product_id))?;
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        Ok(())
    }

    /// Remove the line for a product.
    ///
    /// Returns `true` if a line was removed. Removing an absent product is a no-op.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id(n: i32) -> ProductId {
        ProductId::new(n)
    }

    fn cart(lines: &[(i32, u32)]) -> Cart {
        Cart::from_lines(lines.iter().map(|&(p, q)| CartLine::new(id(p), q)))
    }

    #[test]
    fn test_add_appends_new_line() {
        let mut c = Cart::new();
        c.add(id(1), 2).unwrap();
        assert_eq!(c, cart(&[(1, 2)]));
    }

    #[test]
    fn test_add_accumulates() {
        let mut c = Cart::new();
        c.add(id(1), 2).unwrap();
        c.add(id(1), 3).unwrap();
        assert_eq!(c.lines(), &[CartLine::new(id(1), 5)]);
    }

    #[test]
    fn test_add_preserves_first_insertion_order() {
        let mut c = Cart::new();
        c.add(id(3), 1).unwrap();
        c.add(id(1), 1).unwrap();
        c.add(id(3), 4).unwrap();
        let order: Vec<i32> = c.lines().iter().map(|l| l.product_id.as_i32()).collect();
        assert_eq!(order, vec![3, 1]);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut c = cart(&[(1, 2)]);
        assert_eq!(c.add(id(1), 0), Err(CartError::InvalidQuantity(0)));
        assert_eq!(c.add(id(2), -4), Err(CartError::InvalidQuantity(-4)));
        assert_eq!(c, cart(&[(1, 2)]));
    }

    #[test]
    fn test_add_overflow_leaves_cart_unchanged() {
        let mut c = cart(&[(1, u32::MAX - 1)]);
        assert_eq!(c.add(id(1), 2), Err(CartError::QuantityOverflow(id(1))));
        assert_eq!(c.line(id(1)).unwrap().quantity, u32::MAX - 1);

        assert_eq!(
            c.add(id(2), i64::from(u32::MAX) + 1),
            Err(CartError::QuantityOverflow(id(2)))
        );
        assert!(!c.contains(id(2)));
    }

    #[test]
    fn test_set_quantity_updates_in_place() {
        let mut c = cart(&[(1, 1), (2, 1)]);
        c.set_quantity(id(1), 7).unwrap();
        assert_eq!(c, cart(&[(1, 7), (2, 1)]));
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut c = cart(&[(1, 5)]);
        c.set_quantity(id(1), 0).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn test_set_quantity_negative_removes_line() {
        let mut c = cart(&[(1, 5), (2, 1)]);
        c.set_quantity(id(1), -3).unwrap();
        assert_eq!(c, cart(&[(2, 1)]));
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut c = Cart::new();
        assert_eq!(c.set_quantity(id(9), 1), Err(CartError::NotInCart(id(9))));
        assert!(c.is_empty());
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut c = cart(&[(1, 1)]);
        assert!(!c.remove(id(2)));
        assert_eq!(c, cart(&[(1, 1)]));
        assert!(c.remove(id(1)));
        assert!(c.is_empty());
    }

    #[test]
    fn test_from_lines_merges_duplicates_and_drops_zero() {
        let c = Cart::from_lines([
            CartLine::new(id(2), 1),
            CartLine::new(id(1), 0),
            CartLine::new(id(3), 2),
            CartLine::new(id(2), 4),
        ]);
        assert_eq!(
            c.lines(),
            &[CartLine::new(id(2), 5), CartLine::new(id(3), 2)]
        );
    }

    #[test]
    fn test_total_quantity() {
        assert_eq!(cart(&[(1, 2), (2, 3)]).total_quantity(), 5);
        assert_eq!(Cart::new().total_quantity(), 0);
    }

    #[test]
    fn test_cart_json_shape() {
        let c = cart(&[(1, 2)]);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json, serde_json::json!([{"productId": 1, "quantity": 2}]));

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_cart_json_rejects_negative_quantity() {
        let json = r#"[{"productId": 1, "quantity": -1}]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }
}
