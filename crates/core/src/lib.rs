//! Minimart Core - Shared domain types.
//!
//! This crate provides the types used across all Minimart components:
//! - `storefront` - JSON API and browser page
//! - `cli` - Command-line tools for catalog and cart maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and pure transformations - no I/O, no
//! file access, no HTTP. Every cart mutation the API exposes is a method on
//! [`Cart`]; the storefront only loads, applies, and persists.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, products, cart lines, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
