//! Core types for Minimart.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartError, CartLine};
pub use catalog::CatalogIssue;
pub use id::*;
pub use price::{Price, PriceError};
pub use product::Product;
