//! Cart commands.
//!
//! Each command opens the file-backed cart described by the environment,
//! applies one operation and reports the result through `tracing`.

use go_marketplace_cart::{CartConfig, CartError, CartStore};
use go_marketplace_core::{Price, ProductDescriptor, ProductId};
use tracing::info;

/// Open the configured cart and wait for the stored snapshot to load.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub async fn open() -> Result<CartStore, Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    info!(
        dir = %config.storage_dir.display(),
        key = %config.snapshot_key,
        "Opening cart"
    );

    let store = CartStore::from_config(&config);
    store.wait_until_loaded().await;
    Ok(store)
}

/// Log every line and the cart totals.
pub fn show(store: &CartStore) {
    let cart = store.cart();

    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }

    info!("Cart");
    info!("====");
    for item in cart.items() {
        info!(
            "  {} x{} {} @ {} = {}",
            item.id,
            item.quantity,
            item.title,
            item.price,
            item.line_total()
        );
    }
    info!("Items: {}", cart.total_quantity());
    info!("Subtotal: {}", cart.subtotal());
}

/// Add one unit of a product.
pub fn add(store: &CartStore, id: String, title: String, image_url: String, price: Price) {
    let product = ProductDescriptor::new(id, title, image_url, price);
    let id = product.id.clone();
    store.add_to_cart(product);
    report(store, &id);
}

/// Add one unit to an existing line.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn increment(store: &CartStore, id: &str) -> Result<(), CartError> {
    let id = ProductId::new(id);
    store.increment(&id)?;
    report(store, &id);
    Ok(())
}

/// Remove one unit from an existing line.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn decrement(store: &CartStore, id: &str) -> Result<(), CartError> {
    let id = ProductId::new(id);
    store.decrement(&id)?;
    report(store, &id);
    Ok(())
}

/// Remove a line entirely.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn remove(store: &CartStore, id: &str) -> Result<(), CartError> {
    let id = ProductId::new(id);
    store.remove(&id)?;
    report(store, &id);
    Ok(())
}

/// Empty the cart.
pub fn clear(store: &CartStore) {
    store.clear();
    info!("Cart cleared");
}

fn report(store: &CartStore, id: &ProductId) {
    match store.get(id) {
        Some(item) => info!(product_id = %id, quantity = item.quantity.get(), "Updated line"),
        None => info!(product_id = %id, "Line removed"),
    }
}
