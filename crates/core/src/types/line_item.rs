//! Cart line items.
//!
//! Field names on the wire (`id`, `title`, `image_url`, `price`, `quantity`)
//! match the snapshot layout written by earlier releases of the mobile app.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, Quantity};

/// A product as offered by the catalog, before it is placed in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    /// Catalog identifier. Unique within a cart.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Product image location.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
}

impl ProductDescriptor {
    /// Create a new product descriptor.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// One product in the cart together with how many units were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
    pub quantity: Quantity,
}

impl LineItem {
    /// Start a new line for `product` holding a single unit.
    #[must_use]
    pub fn from_product(product: ProductDescriptor) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: Quantity::ONE,
        }
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

impl From<ProductDescriptor> for LineItem {
    fn from(product: ProductDescriptor) -> Self {
        Self::from_product(product)
    }
}
