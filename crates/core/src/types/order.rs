//! Order types for checkout submission.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::Quantity;
use super::id::{OrderId, ProductId, UserId};

/// One line of an order, denormalized from the cart at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub price: Decimal,
}

/// Payload for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
    /// Free-form shipping address fields (name, line1, city, pincode, ...).
    pub address: HashMap<String, String>,
    pub payment_method: String,
}

/// A created order as echoed back by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
    pub address: HashMap<String, String>,
    pub payment_method: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
