//! Cart snapshot encoding.
//!
//! A snapshot is the whole cart serialized as a JSON array of line items and
//! stored under a single key. Every write replaces the previous snapshot.

use std::collections::HashSet;

use go_marketplace_core::{LineItem, ProductId};
use thiserror::Error;

use crate::cart::Cart;

/// Key under which the cart snapshot is stored.
pub const CART_SNAPSHOT_KEY: &str = "@GoMarketPlace:cart";

/// Errors that can occur while encoding or decoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snapshot record at index {index}: {source}")]
    Record {
        index: usize,
        source: serde_json::Error,
    },

    #[error("Snapshot contains product {0} more than once")]
    DuplicateId(ProductId),
}

/// Encode line items as a snapshot string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(items: &[LineItem]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(items)?)
}

/// Decode a snapshot string into a cart.
///
/// # Errors
///
/// Returns an error if the JSON is not an array, a record is malformed (for
/// example a zero quantity or a negative price), or the same product ID
/// appears twice. A bad record is reported by its position in the array.
pub fn decode(raw: &str) -> Result<Cart, SnapshotError> {
    let records: Vec<serde_json::Value> = serde_json::from_str(raw)?;

    let items = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value::<LineItem>(record)
                .map_err(|source| SnapshotError::Record { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(&item.id) {
            return Err(SnapshotError::DuplicateId(item.id.clone()));
        }
    }

    Ok(Cart::from_items(items))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use go_marketplace_core::{Price, ProductDescriptor, Quantity};

    use super::*;

    #[test]
    fn test_roundtrip_preserves_order_and_fields() {
        let mut cart = Cart::new();
        cart.add(ProductDescriptor::new("b", "Hat", "img/b", Price::from_cents(1999)));
        cart.add(ProductDescriptor::new("a", "Shirt", "img/a", Price::from_cents(5000)));
        cart.add(ProductDescriptor::new("a", "Shirt", "img/a", Price::from_cents(5000)));

        let raw = encode(cart.items()).unwrap();
        let decoded = decode(&raw).unwrap();

        assert_eq!(decoded, cart);
    }

    #[test]
    fn test_decode_legacy_snapshot() {
        let raw = r#"[{"id":"p1","title":"Shirt","image_url":"u","price":50,"quantity":2}]"#;
        let cart = decode(raw).unwrap();

        assert_eq!(cart.len(), 1);
        let item = cart.get(&ProductId::new("p1")).unwrap();
        assert_eq!(item.title, "Shirt");
        assert_eq!(item.image_url, "u");
        assert_eq!(item.price, Price::from_cents(5000));
        assert_eq!(item.quantity, Quantity::new(2).unwrap());
    }

    #[test]
    fn test_encode_field_names() {
        let mut cart = Cart::new();
        cart.add(ProductDescriptor::new("p1", "Shirt", "u", Price::from_cents(5000)));

        let value: serde_json::Value = serde_json::from_str(&encode(cart.items()).unwrap()).unwrap();
        let record = &value[0];
        assert_eq!(record["id"], "p1");
        assert_eq!(record["title"], "Shirt");
        assert_eq!(record["image_url"], "u");
        assert!(record["price"].is_number());
        assert_eq!(record["quantity"], 1);
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_duplicates() {
        let raw = r#"[
            {"id":"p1","title":"A","image_url":"u","price":1,"quantity":1},
            {"id":"p1","title":"B","image_url":"u","price":1,"quantity":1}
        ]"#;
        assert!(matches!(decode(raw), Err(SnapshotError::DuplicateId(id)) if id.as_str() == "p1"));
    }

    #[test]
    fn test_decode_rejects_zero_quantity() {
        let raw = r#"[{"id":"p1","title":"A","image_url":"u","price":1,"quantity":0}]"#;
        assert!(matches!(decode(raw), Err(SnapshotError::Record { index: 0, .. })));
    }

    #[test]
    fn test_decode_names_bad_price_record() {
        let raw = r#"[
            {"id":"p1","title":"A","image_url":"u","price":1,"quantity":1},
            {"id":"p2","title":"B","image_url":"u","price":-5,"quantity":1},
            {"id":"p3","title":"C","image_url":"u","price":1e30,"quantity":1}
        ]"#;
        let err = decode(raw).unwrap_err();
        assert!(matches!(err, SnapshotError::Record { index: 1, .. }));
        assert!(err.to_string().contains("index 1"));

        let raw = r#"[{"id":"p3","title":"C","image_url":"u","price":1e30,"quantity":1}]"#;
        assert!(matches!(decode(raw), Err(SnapshotError::Record { index: 0, .. })));
    }

    #[test]
    fn test_accepted_prices_survive_roundtrip() {
        for raw in ["19.99", "0.1", "1234567.891", "0", "50"] {
            let price: Price = raw.parse().unwrap();
            let mut cart = Cart::new();
            cart.add(ProductDescriptor::new("p1", "Shirt", "u", price));

            let decoded = decode(&encode(cart.items()).unwrap()).unwrap();
            let item = decoded.get(&ProductId::new("p1")).unwrap();
            assert_eq!(item.price.amount(), price.amount(), "{raw} changed in storage");
        }
    }

    #[test]
    fn test_high_precision_price_never_reaches_storage() {
        for raw in ["0.12345678901234567890", "79228162514264337593543950.335"] {
            assert!(raw.parse::<Price>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("not json").is_err());
    }
}
