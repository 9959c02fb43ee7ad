//! Cart operation errors.

use go_marketplace_core::ProductId;
use thiserror::Error;

/// Errors returned by cart operations.
///
/// Persistence failures are not part of this type: they are logged by the
/// background writer and never reach the caller of a mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// No line item with this product ID is in the cart.
    #[error("Item not found in cart: {0}")]
    ItemNotFound(ProductId),

    /// `use_cart` was called outside of a `CartProvider` scope.
    #[error("use_cart must be used within a CartProvider")]
    OutsideProvider,
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::ItemNotFound(ProductId::new("p-123"));
        assert_eq!(err.to_string(), "Item not found in cart: p-123");

        assert_eq!(
            CartError::OutsideProvider.to_string(),
            "use_cart must be used within a CartProvider"
        );
    }
}
