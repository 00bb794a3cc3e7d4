//! Endpoint surface: caching, auth attachment, orders, stores, and leads.

use std::collections::HashMap;

use rust_decimal::Decimal;

use golden_era_client::StorefrontApi;
use golden_era_core::{
    AppointmentRequest, ExchangeLead, OrderDraft, OrderLine, ProductId, Quantity, UserId,
};

use golden_era_integration_tests::{MockBackend, init_tracing, sample_product, sample_store};

async fn setup() -> (MockBackend, tempfile::TempDir, StorefrontApi) {
    init_tracing();
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = backend.client_config(dir.path().join("state.json"));
    let api = StorefrontApi::new(&config).expect("api client");
    (backend, dir, api)
}

#[tokio::test]
async fn test_product_reads_are_cached() {
    let (backend, _dir, api) = setup().await;
    backend
        .state
        .seed_products(vec![sample_product("p-1", "Gold Bangle", "bangles")]);
    let id = ProductId::new("p-1");

    let first = api.get_product(&id).await.expect("first read");
    let second = api.get_product(&id).await.expect("cached read");

    assert_eq!(first, second);
    assert_eq!(backend.state.hits("GET", "/api/products/p-1"), 1);

    api.invalidate_product(&id).await;
    api.get_product(&id).await.expect("read after invalidation");
    assert_eq!(backend.state.hits("GET", "/api/products/p-1"), 2);
}

#[tokio::test]
async fn test_search_listings_bypass_the_cache() {
    let (backend, _dir, api) = setup().await;
    backend
        .state
        .seed_products(vec![sample_product("p-1", "Gold Bangle", "bangles")]);

    let filters = golden_era_client::api::ProductFilters::search("gold");
    api.list_products(&filters).await.expect("first search");
    api.list_products(&filters).await.expect("second search");

    assert_eq!(backend.state.hits("GET", "/api/products"), 2);
}

#[tokio::test]
async fn test_bearer_token_attached_when_present() {
    let (backend, _dir, api) = setup().await;

    api.cart(&UserId::guest()).await.expect("anonymous request");
    assert_eq!(backend.state.last_authorization(), None);

    api.storage().set_auth_token("tok-123").expect("persist token");
    api.cart(&UserId::guest()).await.expect("authorized request");
    assert_eq!(
        backend.state.last_authorization().as_deref(),
        Some("Bearer tok-123")
    );
}

#[tokio::test]
async fn test_create_order_echoes_the_draft() {
    let (_backend, _dir, api) = setup().await;
    let draft = OrderDraft {
        user_id: UserId::guest(),
        items: vec![OrderLine {
            product_id: ProductId::new("p-1"),
            quantity: Quantity::ONE,
            size: None,
            price: Decimal::new(45_999, 0),
        }],
        total: Decimal::new(45_999, 0),
        address: HashMap::from([("city".to_string(), "Chennai".to_string())]),
        payment_method: "cod".to_string(),
    };

    let order = api.create_order(&draft).await.expect("order created");

    assert!(!order.id.as_str().is_empty());
    assert_eq!(order.status, "pending");
    assert_eq!(order.items, draft.items);
    assert_eq!(order.total, draft.total);
}

#[tokio::test]
async fn test_stores_filter_by_city() {
    let (backend, _dir, api) = setup().await;
    backend.state.seed_stores(vec![
        sample_store("s-1", "Chennai"),
        sample_store("s-2", "Coimbatore"),
    ]);

    let all = api.list_stores(None).await.expect("all stores");
    assert_eq!(all.len(), 2);

    let chennai = api.list_stores(Some("Chennai")).await.expect("filtered");
    assert_eq!(chennai.len(), 1);
    assert_eq!(chennai[0].city, "Chennai");
}

#[tokio::test]
async fn test_lead_submissions_succeed() {
    let (backend, _dir, api) = setup().await;

    api.submit_exchange_lead(&ExchangeLead {
        name: "A. Seller".to_string(),
        phone: "9000000000".to_string(),
        email: "seller@example.com".to_string(),
        city: "Chennai".to_string(),
        gold_type: "ornament".to_string(),
        approximate_weight: "20g".to_string(),
    })
    .await
    .expect("exchange lead accepted");

    api.create_appointment(&AppointmentRequest {
        name: "A. Buyer".to_string(),
        phone: "9000000001".to_string(),
        city: "Chennai".to_string(),
        preferred_store: "s-1".to_string(),
        date: "2026-09-15".to_string(),
        time: "11:00".to_string(),
        purpose: "ring sizing".to_string(),
    })
    .await
    .expect("appointment accepted");

    assert_eq!(backend.state.hits("POST", "/api/exchange-leads"), 1);
    assert_eq!(backend.state.hits("POST", "/api/appointments"), 1);
}
