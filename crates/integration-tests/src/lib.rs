//! Integration tests for GoMarketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Restart/reload against memory and file backends
//! - `cart_scenarios` - End-to-end operation sequences and the scoped accessor
//!
//! Shared fixtures live here so each test file stays focused on behavior.

use go_marketplace_core::{Price, ProductDescriptor, ProductId};

/// A product with a predictable title and price.
#[must_use]
pub fn product(id: &str) -> ProductDescriptor {
    ProductDescriptor::new(
        id,
        format!("Product {id}"),
        format!("https://cdn.example/{id}.png"),
        Price::from_cents(1000),
    )
}

/// Shorthand for a product ID.
#[must_use]
pub fn pid(id: &str) -> ProductId {
    ProductId::new(id)
}
