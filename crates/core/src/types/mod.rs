//! Core types for GoMarketplace.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod id;
pub mod line_item;
pub mod price;
pub mod quantity;

pub use id::*;
pub use line_item::{LineItem, ProductDescriptor};
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
