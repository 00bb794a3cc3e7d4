//! Search suggestion types.
//!
//! Suggestions are transient: regenerated per query, never stored. The kind
//! tag drives what selecting a suggestion does - product suggestions open a
//! detail view, category suggestions open a filtered listing, and anything
//! else falls back to a plain text search.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Classification of a suggestion, tagged by the backend's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SuggestionKind {
    /// A concrete product; selecting it opens the product detail view.
    #[serde(rename_all = "camelCase")]
    Product {
        id: ProductId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        price: Option<Decimal>,
    },
    /// A category; selecting it opens the filtered listing.
    Category { slug: String },
    /// A free-text term; selecting it re-runs a plain search.
    #[serde(other)]
    Term,
}

/// One entry in the suggestion list for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(flatten)]
    pub kind: SuggestionKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Suggestion {
    /// A plain text-search suggestion.
    #[must_use]
    pub fn term(name: impl Into<String>) -> Self {
        Self {
            kind: SuggestionKind::Term,
            name: name.into(),
            category: None,
            image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_suggestion_decodes() {
        let json = r#"{
            "type": "product",
            "id": "p-1",
            "name": "Gold Bangle",
            "category": "bangles",
            "price": 45999.0
        }"#;
        let s: Suggestion = serde_json::from_str(json).expect("decode");
        match s.kind {
            SuggestionKind::Product { ref id, price } => {
                assert_eq!(id.as_str(), "p-1");
                assert!(price.is_some());
            }
            ref other => panic!("expected product, got {other:?}"),
        }
        assert_eq!(s.category.as_deref(), Some("bangles"));
    }

    #[test]
    fn test_category_suggestion_decodes() {
        let json = r#"{"type": "category", "slug": "rings", "name": "Rings"}"#;
        let s: Suggestion = serde_json::from_str(json).expect("decode");
        assert_eq!(s.kind, SuggestionKind::Category { slug: "rings".to_string() });
    }

    #[test]
    fn test_unknown_type_falls_back_to_term() {
        let json = r#"{"type": "trending", "name": "temple jewellery"}"#;
        let s: Suggestion = serde_json::from_str(json).expect("decode");
        assert_eq!(s.kind, SuggestionKind::Term);
        assert_eq!(s.name, "temple jewellery");
    }
}
