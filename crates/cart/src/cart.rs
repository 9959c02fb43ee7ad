//! Cart state and the quantity rules applied to it.
//!
//! [`Cart`] is plain data with no I/O; [`crate::CartStore`] wraps it with
//! locking and persistence.

use go_marketplace_core::{LineItem, Price, ProductDescriptor, ProductId, Quantity};

use crate::error::{CartError, Result};

/// Ordered collection of line items, at most one per product ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from items already known to have unique IDs.
    pub(crate) const fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart and return its line items.
    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Add one unit of `product`.
    ///
    /// An existing line keeps its title, image and price and only gains a
    /// unit; otherwise a new line is appended. Returns the line's new quantity.
    pub fn add(&mut self, product: ProductDescriptor) -> Quantity {
        if let Some(item) = self.find_mut(&product.id) {
            item.quantity = item.quantity.increment();
            return item.quantity;
        }

        self.items.push(LineItem::from_product(product));
        Quantity::ONE
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has this ID.
    pub fn increment(&mut self, id: &ProductId) -> Result<Quantity> {
        let item = self
            .find_mut(id)
            .ok_or_else(|| CartError::ItemNotFound(id.clone()))?;
        item.quantity = item.quantity.increment();
        Ok(item.quantity)
    }

    /// Remove one unit from an existing line, dropping the line at zero.
    ///
    /// Returns the remaining quantity, or `None` if the line was removed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has this ID.
    pub fn decrement(&mut self, id: &ProductId) -> Result<Option<Quantity>> {
        let index = self
            .position(id)
            .ok_or_else(|| CartError::ItemNotFound(id.clone()))?;

        let Some(item) = self.items.get_mut(index) else {
            return Err(CartError::ItemNotFound(id.clone()));
        };

        match item.quantity.decrement() {
            Some(quantity) => {
                item.quantity = quantity;
                Ok(Some(quantity))
            }
            None => {
                self.items.remove(index);
                Ok(None)
            }
        }
    }

    /// Remove a line regardless of its quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has this ID.
    pub fn remove(&mut self, id: &ProductId) -> Result<LineItem> {
        let index = self
            .position(id)
            .ok_or_else(|| CartError::ItemNotFound(id.clone()))?;
        Ok(self.items.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    fn find_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }
}
