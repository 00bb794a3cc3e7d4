//! Test harness for the Golden Era client.
//!
//! Provides [`MockBackend`], an in-process axum server that mimics the
//! storefront REST API with in-memory state, per-route hit counting, fault
//! injection (fail the next N requests to a route with a chosen status), and
//! response delays keyed by query substring. Tests drive the real client
//! against it and assert on both client-visible results and what the
//! backend actually saw.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post, put};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use url::Url;

use golden_era_client::config::ClientConfig;
use golden_era_client::error::{Notification, Notifier};
use golden_era_core::{
    Availability, CartLine, NewCartLine, Order, OrderDraft, OrderId, Product, ProductId,
    ProductPage, Store, StoreId, Suggestion, SuggestionKind, WishlistEntry, WishlistItemId,
};

/// Install a test tracing subscriber. Safe to call from every test; only the
/// first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Notifier that records everything it is told, for assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Everything notified so far, in order.
    #[must_use]
    pub fn seen(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.notifications).push(notification);
    }
}

/// A planned failure for a route.
#[derive(Debug, Clone)]
struct Fault {
    remaining: u32,
    status: u16,
    body: serde_json::Value,
}

/// Shared state of the mock backend.
#[derive(Debug, Default)]
pub struct BackendState {
    products: Mutex<Vec<Product>>,
    cart: Mutex<Vec<CartLine>>,
    wishlist: Mutex<Vec<WishlistEntry>>,
    stores: Mutex<Vec<Store>>,
    /// Requests seen per "METHOD /path" key, including faulted ones.
    hits: Mutex<HashMap<String, u32>>,
    faults: Mutex<HashMap<String, Fault>>,
    /// Sleep before answering when the request query contains the substring.
    slow_when_query_contains: Mutex<Option<(String, Duration)>>,
    /// Hold the next N responses for a route after the handler has run, so
    /// the response carries the state as of issue time, not resolution time.
    slow_next: Mutex<HashMap<String, (u32, Duration)>>,
    /// Last `Authorization` header value seen on any request.
    last_authorization: Mutex<Option<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl BackendState {
    /// Number of requests seen for a method + path (query excluded).
    #[must_use]
    pub fn hits(&self, method: &str, path: &str) -> u32 {
        lock(&self.hits)
            .get(&format!("{method} {path}"))
            .copied()
            .unwrap_or(0)
    }

    /// Fail the next `times` requests to `method path` with `status` and a
    /// JSON body.
    pub fn fail_next(&self, method: &str, path: &str, status: u16, times: u32) {
        self.fail_next_with(method, path, status, times, json!({}));
    }

    /// Like [`fail_next`](Self::fail_next) with an explicit error body.
    pub fn fail_next_with(
        &self,
        method: &str,
        path: &str,
        status: u16,
        times: u32,
        body: serde_json::Value,
    ) {
        lock(&self.faults).insert(
            format!("{method} {path}"),
            Fault {
                remaining: times,
                status,
                body,
            },
        );
    }

    /// Delay any response whose request query contains `needle`.
    pub fn slow_down_queries_containing(&self, needle: &str, delay: Duration) {
        *lock(&self.slow_when_query_contains) = Some((needle.to_string(), delay));
    }

    /// Hold the next `times` responses to `method path` for `delay` after
    /// their handlers have run. Later requests to the same route answer at
    /// full speed, so responses can resolve out of issue order.
    pub fn slow_next(&self, method: &str, path: &str, times: u32, delay: Duration) {
        lock(&self.slow_next).insert(format!("{method} {path}"), (times, delay));
    }

    /// The `Authorization` header of the most recent request, if any.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        lock(&self.last_authorization).clone()
    }

    /// Seed the catalog.
    pub fn seed_products(&self, products: Vec<Product>) {
        *lock(&self.products) = products;
    }

    /// Seed the store locations.
    pub fn seed_stores(&self, stores: Vec<Store>) {
        *lock(&self.stores) = stores;
    }

    /// Current cart contents, for direct assertions.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<CartLine> {
        lock(&self.cart).clone()
    }

    /// Current wishlist contents, for direct assertions.
    #[must_use]
    pub fn wishlist_entries(&self) -> Vec<WishlistEntry> {
        lock(&self.wishlist).clone()
    }
}

/// A sample catalog product for tests.
#[must_use]
pub fn sample_product(id: &str, name: &str, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        sku: format!("GE-{id}"),
        category: category.to_string(),
        metal: "gold".to_string(),
        purity: "22K".to_string(),
        metal_color: "yellow".to_string(),
        gross_weight: 10.0,
        price: Decimal::new(45_999, 0),
        description: format!("{name} description"),
        images: vec![],
        tags: vec![],
        occasion: vec![],
        gender: "women".to_string(),
        stone_details: None,
        availability: Availability::default(),
        rating: 4.5,
        review_count: 3,
    }
}

/// An in-process storefront backend bound to an ephemeral port.
pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Arc<BackendState>,
}

impl MockBackend {
    /// Bind and serve on 127.0.0.1 with empty state.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind (test environment error).
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Origin URL of this backend.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        format!("http://{}", self.addr).parse().expect("backend url")
    }

    /// A client config pointed at this backend with fast retries (base
    /// delay 10 ms) and a short debounce so tests stay quick.
    #[must_use]
    pub fn client_config(&self, storage_path: std::path::PathBuf) -> ClientConfig {
        let mut config = ClientConfig::for_origin(self.url());
        config.storage_path = storage_path;
        config.retry.base_delay = Duration::from_millis(10);
        config.debounce = Duration::from_millis(30);
        config
    }
}

fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
        .route("/api/products/related/{id}", get(related_products))
        .route("/api/search/suggestions", get(search_suggestions))
        .route("/api/cart", get(get_cart).post(add_cart).delete(clear_cart))
        .route("/api/cart/{id}", put(update_cart_item).delete(remove_cart_item))
        .route("/api/wishlist", get(get_wishlist).post(add_wishlist))
        .route("/api/wishlist/{id}", axum::routing::delete(remove_wishlist_item))
        .route("/api/orders", post(create_order))
        .route("/api/stores", get(list_stores))
        .route("/api/contact", post(accept_submission))
        .route("/api/exchange-leads", post(accept_submission))
        .route("/api/appointments", post(accept_submission))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            observe_and_inject,
        ))
        .with_state(state)
}

/// Middleware: count the hit, record auth, apply delays and planned faults.
async fn observe_and_inject(
    State(state): State<Arc<BackendState>>,
    request: Request,
    next: Next,
) -> Response {
    let key = format!("{} {}", request.method(), request.uri().path());
    *lock(&state.hits).entry(key.clone()).or_insert(0) += 1;

    let authorization = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    *lock(&state.last_authorization) = authorization;

    let delay = lock(&state.slow_when_query_contains).clone().and_then(
        |(needle, delay)| {
            request
                .uri()
                .query()
                .is_some_and(|q| q.contains(&needle))
                .then_some(delay)
        },
    );
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let fault = {
        let mut faults = lock(&state.faults);
        match faults.get_mut(&key) {
            Some(fault) if fault.remaining > 0 => {
                fault.remaining -= 1;
                Some((fault.status, fault.body.clone()))
            }
            _ => None,
        }
    };
    if let Some((status, body)) = fault {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(body)).into_response();
    }

    let hold = {
        let mut slow = lock(&state.slow_next);
        match slow.get_mut(&key) {
            Some((remaining, delay)) if *remaining > 0 => {
                *remaining -= 1;
                Some(*delay)
            }
            _ => None,
        }
    };

    let response = next.run(request).await;
    if let Some(delay) = hold {
        tokio::time::sleep(delay).await;
    }
    response
}

// =============================================================================
// Catalog handlers
// =============================================================================

async fn list_products(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<ProductPage> {
    let products: Vec<Product> = lock(&state.products)
        .iter()
        .filter(|p| {
            params
                .get("category")
                .is_none_or(|category| &p.category == category)
        })
        .filter(|p| {
            params.get("search").is_none_or(|needle| {
                let needle = needle.to_lowercase();
                p.name.to_lowercase().contains(&needle)
                    || p.sku.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
        })
        .cloned()
        .collect();

    let total = products.len() as u64;
    Json(ProductPage {
        products,
        total,
        page: 1,
        limit: 12,
        pages: u32::from(total > 0),
    })
}

async fn get_product(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
) -> Response {
    let product = lock(&state.products)
        .iter()
        .find(|p| p.id.as_str() == id)
        .cloned();
    match product {
        Some(product) => Json(product).into_response(),
        None => not_found("Product not found"),
    }
}

async fn related_products(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
) -> Response {
    let products = lock(&state.products);
    let Some(product) = products.iter().find(|p| p.id.as_str() == id) else {
        return not_found("Product not found");
    };
    let related: Vec<Product> = products
        .iter()
        .filter(|p| p.id != product.id && p.category == product.category)
        .take(8)
        .cloned()
        .collect();
    Json(related).into_response()
}

async fn search_suggestions(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Suggestion>> {
    let query = params.get("q").cloned().unwrap_or_default();
    if query.len() < 2 {
        return Json(Vec::new());
    }

    let needle = query.to_lowercase();
    let suggestions = lock(&state.products)
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .take(5)
        .map(|p| Suggestion {
            kind: SuggestionKind::Product {
                id: p.id.clone(),
                price: Some(p.price),
            },
            name: p.name.clone(),
            category: Some(p.category.clone()),
            image: p.images.first().cloned(),
        })
        .collect();
    Json(suggestions)
}

// =============================================================================
// Cart handlers
// =============================================================================

async fn get_cart(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<CartLine>> {
    let user = params.get("userId").cloned().unwrap_or_default();
    let lines = lock(&state.cart)
        .iter()
        .filter(|line| line.user_id.as_str() == user)
        .cloned()
        .collect();
    Json(lines)
}

async fn add_cart(
    State(state): State<Arc<BackendState>>,
    Json(new_line): Json<NewCartLine>,
) -> Json<serde_json::Value> {
    let line = CartLine {
        id: uuid::Uuid::new_v4().to_string().into(),
        product_id: new_line.product_id,
        quantity: new_line.quantity,
        size: new_line.size,
        user_id: new_line.user_id,
    };
    lock(&state.cart).push(line);
    Json(json!({"message": "Item added to cart"}))
}

async fn update_cart_item(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(quantity) = params
        .get("quantity")
        .and_then(|q| q.parse::<i64>().ok())
        .and_then(|q| golden_era_core::Quantity::new(q).ok())
    else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "Invalid quantity"})),
        )
            .into_response();
    };

    let mut cart = lock(&state.cart);
    match cart.iter_mut().find(|line| line.id.as_str() == id) {
        Some(line) => {
            line.quantity = quantity;
            Json(json!({"message": "Cart updated"})).into_response()
        }
        None => not_found("Cart item not found"),
    }
}

async fn remove_cart_item(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
) -> Response {
    let mut cart = lock(&state.cart);
    let before = cart.len();
    cart.retain(|line| line.id.as_str() != id);
    if cart.len() == before {
        return not_found("Cart item not found");
    }
    Json(json!({"message": "Item removed"})).into_response()
}

async fn clear_cart(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let user = params.get("userId").cloned().unwrap_or_default();
    lock(&state.cart).retain(|line| line.user_id.as_str() != user);
    Json(json!({"message": "Cart cleared"}))
}

// =============================================================================
// Wishlist handlers
// =============================================================================

async fn get_wishlist(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<WishlistEntry>> {
    let user = params.get("userId").cloned().unwrap_or_default();
    let entries = lock(&state.wishlist)
        .iter()
        .filter(|entry| entry.user_id.as_str() == user)
        .cloned()
        .collect();
    Json(entries)
}

async fn add_wishlist(
    State(state): State<Arc<BackendState>>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    let Some(product_id) = payload.get("productId").and_then(|v| v.as_str()) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "productId is required"})),
        )
            .into_response();
    };
    let user = payload
        .get("userId")
        .and_then(|v| v.as_str())
        .unwrap_or("guest");

    let entry = WishlistEntry {
        id: WishlistItemId::new(uuid::Uuid::new_v4().to_string()),
        product_id: ProductId::new(product_id),
        user_id: user.into(),
    };
    lock(&state.wishlist).push(entry);
    Json(json!({"message": "Added to wishlist"})).into_response()
}

async fn remove_wishlist_item(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
) -> Response {
    let mut wishlist = lock(&state.wishlist);
    let before = wishlist.len();
    wishlist.retain(|entry| entry.id.as_str() != id);
    if wishlist.len() == before {
        return not_found("Wishlist item not found");
    }
    Json(json!({"message": "Removed from wishlist"})).into_response()
}

// =============================================================================
// Orders, stores, leads
// =============================================================================

async fn create_order(Json(draft): Json<OrderDraft>) -> Json<Order> {
    Json(Order {
        id: OrderId::new(uuid::Uuid::new_v4().to_string()),
        user_id: draft.user_id,
        items: draft.items,
        total: draft.total,
        address: draft.address,
        payment_method: draft.payment_method,
        status: "pending".to_string(),
        created_at: Utc::now(),
    })
}

async fn list_stores(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Store>> {
    let stores = lock(&state.stores)
        .iter()
        .filter(|store| params.get("city").is_none_or(|city| &store.city == city))
        .cloned()
        .collect();
    Json(stores)
}

async fn accept_submission(Json(_body): Json<serde_json::Value>) -> Json<serde_json::Value> {
    Json(json!({"message": "ok"}))
}

fn not_found(detail: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": detail}))).into_response()
}

/// A sample store location.
#[must_use]
pub fn sample_store(id: &str, city: &str) -> Store {
    Store {
        id: StoreId::new(id),
        name: format!("Golden Era {city}"),
        address: "12 Main Road".to_string(),
        city: city.to_string(),
        pincode: "600017".to_string(),
        phone: "044-00000000".to_string(),
        hours: "10:00-21:00".to_string(),
    }
}
