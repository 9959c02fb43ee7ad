//! Scoped access to a cart store.
//!
//! Passing a [`CartStore`] explicitly is the preferred way to reach the cart.
//! For code that sits several layers below where the store was created,
//! [`CartProvider`] installs a store for the duration of a future and
//! [`use_cart`] retrieves it from anywhere inside that future.
//!
//! The scope is task-local: tasks started with `tokio::spawn` from inside a
//! provider do not inherit it and must be given a handle instead.

use std::future::Future;

use go_marketplace_core::{LineItem, ProductDescriptor, ProductId};

use crate::error::{CartError, Result};
use crate::store::CartStore;

tokio::task_local! {
    static CURRENT_CART: CartStore;
}

/// Installs a cart store for code running inside a scope.
pub struct CartProvider;

impl CartProvider {
    /// Run `future` with `store` available through [`use_cart`].
    pub async fn scope<F: Future>(store: CartStore, future: F) -> F::Output {
        CURRENT_CART.scope(store, future).await
    }

    /// Run a synchronous closure with `store` available through [`use_cart`].
    pub fn sync_scope<R>(store: CartStore, f: impl FnOnce() -> R) -> R {
        CURRENT_CART.sync_scope(store, f)
    }
}

/// Products plus the cart operations, as seen at the time of access.
#[derive(Debug, Clone)]
pub struct CartContext {
    products: Vec<LineItem>,
    store: CartStore,
}

impl CartContext {
    /// Line items as they were when this context was obtained.
    #[must_use]
    pub fn products(&self) -> &[LineItem] {
        &self.products
    }

    /// Add one unit of a product.
    pub fn add_to_cart(&self, product: ProductDescriptor) {
        self.store.add_to_cart(product);
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the product is not in the cart.
    pub fn increment(&self, id: &ProductId) -> Result<()> {
        self.store.increment(id)
    }

    /// Remove one unit from an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the product is not in the cart.
    pub fn decrement(&self, id: &ProductId) -> Result<()> {
        self.store.decrement(id)
    }

    /// The underlying store handle.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }
}

/// Get the cart installed by the enclosing [`CartProvider`].
///
/// # Errors
///
/// Returns [`CartError::OutsideProvider`] when called outside any provider scope.
pub fn use_cart() -> Result<CartContext> {
    CURRENT_CART
        .try_with(|store| CartContext {
            products: store.products(),
            store: store.clone(),
        })
        .map_err(|_| CartError::OutsideProvider)
}
