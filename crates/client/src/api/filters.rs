//! Listing filters for `GET /products`.

use rust_decimal::Decimal;

/// Sort orders the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Featured,
    Newest,
    PriceLowToHigh,
    PriceHighToLow,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Newest => "newest",
            Self::PriceLowToHigh => "price_low",
            Self::PriceHighToLow => "price_high",
        }
    }
}

/// Query filters for the product listing.
///
/// Every field is optional; an empty filter set lists the whole catalog with
/// backend-default pagination.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub search: Option<String>,
    pub metal: Option<String>,
    pub purity: Option<String>,
    pub metal_color: Option<String>,
    pub occasion: Option<String>,
    pub gender: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: Option<SortKey>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductFilters {
    /// Filter to one category.
    #[must_use]
    pub fn category(name: impl Into<String>) -> Self {
        Self {
            category: Some(name.into()),
            ..Self::default()
        }
    }

    /// Free-text search filter.
    #[must_use]
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search: Some(query.into()),
            ..Self::default()
        }
    }

    /// Whether this listing depends on a free-text search term.
    /// Search results are never cached.
    #[must_use]
    pub const fn is_search(&self) -> bool {
        self.search.is_some()
    }

    /// Render as query parameters in the backend's camelCase names.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                query.push((key, value));
            }
        };

        push("category", self.category.clone());
        push("search", self.search.clone());
        push("metal", self.metal.clone());
        push("purity", self.purity.clone());
        push("metalColor", self.metal_color.clone());
        push("occasion", self.occasion.clone());
        push("gender", self.gender.clone());
        push("minPrice", self.min_price.map(|p| p.to_string()));
        push("maxPrice", self.max_price.map(|p| p.to_string()));
        push("sort", self.sort.map(|s| s.as_str().to_string()));
        push("page", self.page.map(|p| p.to_string()));
        push("limit", self.limit.map(|l| l.to_string()));
        query
    }

    /// Stable key for the listing cache.
    pub(crate) fn cache_key(&self) -> String {
        let pairs = self.to_query();
        let mut key = String::from("products");
        for (name, value) in pairs {
            key.push(':');
            key.push_str(name);
            key.push('=');
            key.push_str(&value);
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_empty_query() {
        assert!(ProductFilters::default().to_query().is_empty());
    }

    #[test]
    fn test_query_uses_wire_names() {
        let filters = ProductFilters {
            metal_color: Some("rose".to_string()),
            min_price: Some(Decimal::new(10_000, 0)),
            sort: Some(SortKey::PriceLowToHigh),
            ..ProductFilters::default()
        };
        let query = filters.to_query();
        assert!(query.contains(&("metalColor", "rose".to_string())));
        assert!(query.contains(&("minPrice", "10000".to_string())));
        assert!(query.contains(&("sort", "price_low".to_string())));
    }

    #[test]
    fn test_search_detection() {
        assert!(ProductFilters::search("ring").is_search());
        assert!(!ProductFilters::category("rings").is_search());
    }

    #[test]
    fn test_cache_key_distinguishes_filters() {
        let a = ProductFilters::category("rings").cache_key();
        let b = ProductFilters::category("bangles").cache_key();
        assert_ne!(a, b);
        assert_eq!(a, ProductFilters::category("rings").cache_key());
    }
}
