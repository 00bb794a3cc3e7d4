//! Cart and wishlist line items.
//!
//! Lines are owned by the backing store; views only ever see snapshots.
//! The `New*` payload types are what the client POSTs - the backend assigns
//! the line identity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{CartItemId, ProductId, UserId, WishlistItemId};

/// Error raised when constructing an invalid [`Quantity`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantity must be at least 1 (got {0})")]
    NotPositive(i64),
}

/// A positive cart line quantity.
///
/// The store layer never clamps; callers coerce user input with
/// [`Quantity::clamped`] before invoking a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// One of an item, the default for "add to cart".
    pub const ONE: Self = Self(1);

    /// Create a quantity, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotPositive`] if `value < 1`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v >= 1)
            .map(Self)
            .ok_or(QuantityError::NotPositive(value))
    }

    /// Coerce an arbitrary value to at least 1.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self::new(value).unwrap_or(Self::ONE)
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cart line as returned by `GET /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub user_id: UserId,
}

/// Payload for `POST /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub user_id: UserId,
}

impl NewCartLine {
    /// A single unit of a product with no size variant, for the guest user.
    #[must_use]
    pub fn of(product_id: ProductId) -> Self {
        Self {
            product_id,
            quantity: Quantity::ONE,
            size: None,
            user_id: UserId::guest(),
        }
    }
}

/// A wishlist entry as returned by `GET /wishlist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: WishlistItemId,
    pub product_id: ProductId,
    pub user_id: UserId,
}

/// Payload for `POST /wishlist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWishlistEntry {
    pub product_id: ProductId,
    pub user_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_rejects_non_positive() {
        assert_eq!(Quantity::new(0), Err(QuantityError::NotPositive(0)));
        assert_eq!(Quantity::new(-3), Err(QuantityError::NotPositive(-3)));
        assert_eq!(Quantity::new(2).map(Quantity::get), Ok(2));
    }

    #[test]
    fn test_quantity_clamped() {
        assert_eq!(Quantity::clamped(-5), Quantity::ONE);
        assert_eq!(Quantity::clamped(0), Quantity::ONE);
        assert_eq!(Quantity::clamped(7).get(), 7);
    }

    #[test]
    fn test_cart_line_wire_format() {
        let json = r#"{
            "id": "ci-1",
            "productId": "p-1",
            "quantity": 2,
            "size": "M",
            "userId": "guest"
        }"#;
        let line: CartLine = serde_json::from_str(json).expect("decode");
        assert_eq!(line.quantity.get(), 2);
        assert_eq!(line.size.as_deref(), Some("M"));

        let value = serde_json::to_value(&line).expect("encode");
        assert!(value.get("productId").is_some());
        assert!(value.get("userId").is_some());
    }

    #[test]
    fn test_new_cart_line_omits_absent_size() {
        let payload = NewCartLine::of(ProductId::new("p-9"));
        let value = serde_json::to_value(&payload).expect("encode");
        assert!(value.get("size").is_none());
        assert_eq!(value["quantity"], 1);
        assert_eq!(value["userId"], "guest");
    }
}
