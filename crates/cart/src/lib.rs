//! GoMarketplace Cart - persistent shopping cart store.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the in-memory cart and applies mutations synchronously
//! - A background task hydrates the cart from a [`PersistenceStore`] at startup
//!   and then drains a FIFO write queue, one full snapshot per mutation
//! - [`CartProvider`] / [`use_cart`] expose a store to code running inside a
//!   provider scope without threading the handle through every call
//!
//! Persistence failures are logged and never roll back in-memory state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod context;
pub mod error;
pub mod persistence;
pub mod snapshot;
pub mod store;

pub use cart::Cart;
pub use config::{CartConfig, ConfigError};
pub use context::{CartContext, CartProvider, use_cart};
pub use error::CartError;
pub use persistence::{FileStore, MemoryStore, PersistenceError, PersistenceStore};
pub use snapshot::{CART_SNAPSHOT_KEY, SnapshotError};
pub use store::CartStore;
