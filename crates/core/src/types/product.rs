//! Catalog entities as served by the `/products` endpoints.
//!
//! Field names follow the backend's camelCase wire format. Prices are JSON
//! numbers on the wire and decoded into `rust_decimal::Decimal` so arithmetic
//! on money stays exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A single catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub metal: String,
    pub purity: String,
    pub metal_color: String,
    pub gross_weight: f64,
    pub price: Decimal,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub occasion: Vec<String>,
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stone_details: Option<StoneDetails>,
    pub availability: Availability,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
}

/// Details of any set stones (diamond, gemstone) on a product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoneDetails {
    #[serde(default, rename = "type")]
    pub stone_type: Option<String>,
    #[serde(default)]
    pub carat: Option<f64>,
    #[serde(default)]
    pub clarity: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Fulfilment options for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub ship: bool,
    pub store_pickup: bool,
}

impl Default for Availability {
    fn default() -> Self {
        Self {
            ship: true,
            store_pickup: false,
        }
    }
}

/// Paginated listing envelope returned by `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

impl ProductPage {
    /// An empty first page.
    #[must_use]
    pub fn empty(limit: u32) -> Self {
        Self {
            products: Vec::new(),
            total: 0,
            page: 1,
            limit,
            pages: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": "p-1",
            "name": "Classic Gold Bangle",
            "sku": "GE-BNG-001",
            "category": "bangles",
            "metal": "gold",
            "purity": "22K",
            "metalColor": "yellow",
            "grossWeight": 12.5,
            "price": 45999.0,
            "description": "Handcrafted 22K bangle",
            "images": ["https://cdn.example/p-1.jpg"],
            "tags": ["bestseller"],
            "occasion": ["wedding"],
            "gender": "women",
            "stoneDetails": {"type": "diamond", "carat": 0.2},
            "availability": {"ship": true, "storePickup": true},
            "rating": 4.7,
            "reviewCount": 18
        }"#
    }

    #[test]
    fn test_product_decodes_camel_case() {
        let product: Product = serde_json::from_str(sample_json()).expect("decode");
        assert_eq!(product.metal_color, "yellow");
        assert_eq!(product.gross_weight, 12.5);
        assert!(product.availability.store_pickup);
        let stones = product.stone_details.expect("stone details");
        assert_eq!(stones.stone_type.as_deref(), Some("diamond"));
    }

    #[test]
    fn test_product_price_is_exact() {
        let product: Product = serde_json::from_str(sample_json()).expect("decode");
        assert_eq!(product.price, Decimal::new(459_990, 1));
    }

    #[test]
    fn test_product_roundtrips_field_names() {
        let product: Product = serde_json::from_str(sample_json()).expect("decode");
        let value = serde_json::to_value(&product).expect("encode");
        assert!(value.get("metalColor").is_some());
        assert!(value.get("reviewCount").is_some());
        assert!(value.get("metal_color").is_none());
    }

    #[test]
    fn test_empty_page() {
        let page = ProductPage::empty(12);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 12);
        assert!(page.products.is_empty());
    }
}
