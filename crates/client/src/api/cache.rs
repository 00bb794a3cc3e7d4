//! Cache value types for catalog API responses.

use golden_era_core::{Product, ProductPage};

/// Cached value types. Only immutable-ish catalog reads live here; cart,
/// wishlist, and suggestions are never cached.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Page(Box<ProductPage>),
    Related(Vec<Product>),
}
