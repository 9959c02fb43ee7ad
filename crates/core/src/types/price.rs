//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are held as [`Decimal`] so that cart subtotals never accumulate
//! floating point error. On the wire they are plain JSON numbers, which is
//! what existing device snapshots contain.
//!
//! A JSON number is an `f64`, so a unit price is only accepted when its
//! decimal value comes back unchanged from that `f64`. Anything finer is
//! rejected up front instead of being silently rounded in storage.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Quantity;

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a decimal number: {0}")]
    Invalid(String),
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount has more precision than a JSON number can carry.
    #[error("price {0} cannot be stored without rounding")]
    Imprecise(Decimal),
}

/// A unit price in the store's currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative or does not survive
    /// conversion to a JSON number.
    ///
    /// # Examples
    ///
    /// ```
    /// use go_marketplace_core::Price;
    /// use rust_decimal::Decimal;
    ///
    /// assert!(Price::new(Decimal::new(1999, 2)).is_ok());
    /// assert!(Price::new(Decimal::new(-5, 0)).is_err());
    /// ```
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if from_wire(to_wire(amount)) != Some(amount) {
            return Err(PriceError::Imprecise(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in the smallest currency unit (e.g., cents).
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply this unit price by a quantity.
    ///
    /// Totals are computed values and are never written to a snapshot.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(self.0 * Decimal::from(quantity.get()))
    }
}

/// The number written for `amount` in a snapshot.
fn to_wire(amount: Decimal) -> Option<f64> {
    amount.to_f64()
}

/// The decimal read back from a snapshot number.
fn from_wire(value: Option<f64>) -> Option<Decimal> {
    value
        .filter(|v| v.is_finite())
        .and_then(|v| Decimal::from_str(&v.to_string()).ok())
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_string()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = to_wire(self.0)
            .ok_or_else(|| S::Error::custom(format!("price {} is out of range", self.0)))?;
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        let amount = from_wire(Some(value))
            .ok_or_else(|| D::Error::custom(format!("price {value} is out of range")))?;
        Self::new(amount).map_err(D::Error::custom)
    }
}
