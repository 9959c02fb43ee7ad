//! Line item quantity.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities start at one; a line with nothing in it is removed instead.
    #[error("quantity must be at least 1")]
    Zero,
}

/// How many units of a product sit on a cart line.
///
/// ## Constraints
///
/// - Always at least 1. Decrementing a quantity of 1 yields `None`, which
///   callers treat as "remove the line".
///
/// ## Examples
///
/// ```
/// use go_marketplace_core::Quantity;
///
/// let one = Quantity::ONE;
/// assert_eq!(one.increment().get(), 2);
/// assert_eq!(one.decrement(), None);
/// assert!(Quantity::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] if `value` is zero.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        match NonZeroU32::new(value) {
            Some(n) => Ok(Self(n)),
            None => Err(QuantityError::Zero),
        }
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// One more unit. Saturates at `u32::MAX`.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One fewer unit, or `None` if this was the last one.
    #[must_use]
    pub const fn decrement(self) -> Option<Self> {
        match NonZeroU32::new(self.0.get() - 1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero() {
        assert_eq!(Quantity::new(0), Err(QuantityError::Zero));
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_increment_then_decrement_restores() {
        let q = Quantity::new(4).unwrap();
        assert_eq!(q.increment().decrement(), Some(q));
    }

    #[test]
    fn test_decrement_last_unit() {
        assert_eq!(Quantity::ONE.decrement(), None);
        assert_eq!(Quantity::new(2).unwrap().decrement(), Some(Quantity::ONE));
    }

    #[test]
    fn test_increment_saturates() {
        let max = Quantity::new(u32::MAX).unwrap();
        assert_eq!(max.increment(), max);
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Quantity::new(2).unwrap()).unwrap();
        assert_eq!(json, "2");

        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
        assert_eq!(
            serde_json::from_str::<Quantity>("7").unwrap(),
            Quantity::new(7).unwrap()
        );
    }
}
