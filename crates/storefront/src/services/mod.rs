//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Cart operations, serialized through a single writer
//! - `catalog` - Product lookups with a short-lived cache

pub mod cart;
pub mod catalog;

pub use cart::{CartLineSummary, CartService, CartServiceError, CartSummary};
pub use catalog::CatalogService;
