//! GoMarketplace Core - Shared cart types.
//!
//! This crate provides common types used across all GoMarketplace components:
//! - `go-marketplace-cart` - In-memory cart store with persistence
//! - `go-marketplace-cli` - Command-line driver for a file-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no async
//! runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, quantities, and line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
