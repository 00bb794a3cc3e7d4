//! Typed endpoint surface for the storefront backend.
//!
//! [`StorefrontApi`] groups the REST endpoints behind typed methods, all
//! routed through the resilient [`HttpClient`]. Catalog reads (products,
//! related items) are cached via `moka` for 5 minutes; cart, wishlist, and
//! search suggestions are never cached because they are either mutable state
//! or per-keystroke transients.
//!
//! Error propagation is the caller's choice: the store layer soft-fails or
//! converts to booleans, while page-level submissions (`create_order`, lead
//! forms) receive the raw `Result` and render their own fallback.

mod cache;
mod filters;

pub use filters::{ProductFilters, SortKey};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use golden_era_core::{
    AppointmentRequest, CartItemId, CartLine, ContactForm, ExchangeLead, NewCartLine,
    NewWishlistEntry, Order, OrderDraft, Product, ProductId, ProductPage, Quantity, Store,
    Suggestion, UserId, WishlistEntry, WishlistItemId,
};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::storage::LocalStorage;

use cache::CacheValue;

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Client for the storefront catalog/order API.
///
/// Cheap to clone; clones share the transport, cache, and local storage.
#[derive(Debug, Clone)]
pub struct StorefrontApi {
    inner: Arc<StorefrontApiInner>,
}

#[derive(Debug)]
struct StorefrontApiInner {
    http: HttpClient,
    storage: Arc<LocalStorage>,
    cache: Cache<String, CacheValue>,
}

impl StorefrontApi {
    /// Create an API client, opening local storage at the configured path.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let storage = Arc::new(LocalStorage::open(&config.storage_path));
        Self::with_storage(config, storage)
    }

    /// Create an API client sharing an existing storage handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport fails to build.
    pub fn with_storage(
        config: &ClientConfig,
        storage: Arc<LocalStorage>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::new(config, Arc::clone(&storage))?;
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(StorefrontApiInner {
                http,
                storage,
                cache,
            }),
        })
    }

    /// The client-local storage shared with this API client.
    #[must_use]
    pub fn storage(&self) -> Arc<LocalStorage> {
        Arc::clone(&self.inner.storage)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List products matching the filters.
    ///
    /// Cached unless a free-text search term is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filters: &ProductFilters) -> Result<ProductPage, ApiError> {
        let cache_key = filters.cache_key();

        if !filters.is_search()
            && let Some(CacheValue::Page(page)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for product listing");
            return Ok(*page);
        }

        let page: ProductPage = self
            .inner
            .http
            .get_query("/products", &filters.to_query())
            .await?;

        if !filters.is_search() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Page(Box::new(page.clone())))
                .await;
        }

        Ok(page)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .inner
            .http
            .get(&format!("/products/{}", encode(product_id.as_str())))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Products related to the given one (same category or shared tags).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn related_products(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<Product>, ApiError> {
        let cache_key = format!("related:{product_id}");

        if let Some(CacheValue::Related(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for related products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .inner
            .http
            .get(&format!("/products/related/{}", encode(product_id.as_str())))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Related(products.clone()))
            .await;

        Ok(products)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Typed suggestions for a partial query. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_suggestions(&self, query: &str) -> Result<Vec<Suggestion>, ApiError> {
        self.inner
            .http
            .get_query("/search/suggestions", &[("q", query.to_string())])
            .await
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// The full cart for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn cart(&self, user: &UserId) -> Result<Vec<CartLine>, ApiError> {
        self.inner
            .http
            .get_query("/cart", &[("userId", user.to_string())])
            .await
    }

    /// Add a line to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, line))]
    pub async fn add_cart_line(&self, line: &NewCartLine) -> Result<(), ApiError> {
        self.inner
            .http
            .post::<serde_json::Value, _>("/cart", line)
            .await?;
        Ok(())
    }

    /// Change a cart line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item = %item))]
    pub async fn update_cart_line(
        &self,
        item: &CartItemId,
        quantity: Quantity,
    ) -> Result<(), ApiError> {
        self.inner
            .http
            .put_query::<serde_json::Value>(
                &format!("/cart/{}", encode(item.as_str())),
                &[("quantity", quantity.to_string())],
            )
            .await?;
        Ok(())
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item = %item))]
    pub async fn remove_cart_line(&self, item: &CartItemId) -> Result<(), ApiError> {
        self.inner
            .http
            .delete::<serde_json::Value>(&format!("/cart/{}", encode(item.as_str())), &[])
            .await?;
        Ok(())
    }

    /// Delete a user's whole cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn clear_cart(&self, user: &UserId) -> Result<(), ApiError> {
        self.inner
            .http
            .delete::<serde_json::Value>("/cart", &[("userId", user.to_string())])
            .await?;
        Ok(())
    }

    // =========================================================================
    // Wishlist Methods
    // =========================================================================

    /// The full wishlist for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn wishlist(&self, user: &UserId) -> Result<Vec<WishlistEntry>, ApiError> {
        self.inner
            .http
            .get_query("/wishlist", &[("userId", user.to_string())])
            .await
    }

    /// Add a product to a user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user = %user, product = %product))]
    pub async fn add_wishlist_entry(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> Result<(), ApiError> {
        let entry = NewWishlistEntry {
            product_id: product.clone(),
            user_id: user.clone(),
        };
        self.inner
            .http
            .post::<serde_json::Value, _>("/wishlist", &entry)
            .await?;
        Ok(())
    }

    /// Remove a wishlist entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item = %item))]
    pub async fn remove_wishlist_entry(&self, item: &WishlistItemId) -> Result<(), ApiError> {
        self.inner
            .http
            .delete::<serde_json::Value>(&format!("/wishlist/{}", encode(item.as_str())), &[])
            .await?;
        Ok(())
    }

    // =========================================================================
    // Orders, Stores, Leads
    // =========================================================================

    /// Submit a checkout order. Errors propagate so the checkout page can
    /// show its own fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, draft))]
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<Order, ApiError> {
        self.inner.http.post("/orders", draft).await
    }

    /// Retail store locations, optionally filtered by city.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_stores(&self, city: Option<&str>) -> Result<Vec<Store>, ApiError> {
        let mut query = Vec::new();
        if let Some(city) = city {
            query.push(("city", city.to_string()));
        }
        self.inner.http.get_query("/stores", &query).await
    }

    /// Submit the contact form.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, form))]
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<(), ApiError> {
        self.inner
            .http
            .post::<serde_json::Value, _>("/contact", form)
            .await?;
        Ok(())
    }

    /// Submit a gold-exchange lead.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, lead))]
    pub async fn submit_exchange_lead(&self, lead: &ExchangeLead) -> Result<(), ApiError> {
        self.inner
            .http
            .post::<serde_json::Value, _>("/exchange-leads", lead)
            .await?;
        Ok(())
    }

    /// Book an in-store appointment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request))]
    pub async fn create_appointment(&self, request: &AppointmentRequest) -> Result<(), ApiError> {
        self.inner
            .http
            .post::<serde_json::Value, _>("/appointments", request)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, product_id: &ProductId) {
        self.inner
            .cache
            .invalidate(&format!("product:{product_id}"))
            .await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Percent-encode a path segment.
fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
