//! Retry, backoff, and error normalization against a live mock backend.

use std::time::Duration;

use golden_era_client::config::ClientConfig;
use golden_era_client::error::{ApiError, user_message};
use golden_era_client::StorefrontApi;
use golden_era_core::{ContactForm, ProductId};
use serde_json::json;

use golden_era_integration_tests::{MockBackend, init_tracing, sample_product};

async fn setup() -> (MockBackend, tempfile::TempDir, StorefrontApi) {
    init_tracing();
    let backend = MockBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = backend.client_config(dir.path().join("state.json"));
    let api = StorefrontApi::new(&config).expect("api client");
    (backend, dir, api)
}

fn contact_form() -> ContactForm {
    ContactForm {
        name: "A. Buyer".to_string(),
        email: "buyer@example.com".to_string(),
        phone: Some("not-a-number".to_string()),
        message: "Ring sizing question".to_string(),
    }
}

#[tokio::test]
async fn test_transient_503_recovers() {
    let (backend, _dir, api) = setup().await;
    backend
        .state
        .seed_products(vec![sample_product("p-1", "Gold Bangle", "bangles")]);
    backend.state.fail_next("GET", "/api/products/p-1", 503, 2);

    let product = api
        .get_product(&ProductId::new("p-1"))
        .await
        .expect("recovers after transient failures");

    assert_eq!(product.name, "Gold Bangle");
    // Two failed sends plus the successful one.
    assert_eq!(backend.state.hits("GET", "/api/products/p-1"), 3);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let (backend, _dir, api) = setup().await;
    backend
        .state
        .seed_products(vec![sample_product("p-1", "Gold Bangle", "bangles")]);
    backend.state.fail_next("GET", "/api/products/p-1", 400, 1);

    let err = api
        .get_product(&ProductId::new("p-1"))
        .await
        .expect_err("400 is terminal");

    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert_eq!(backend.state.hits("GET", "/api/products/p-1"), 1);
}

#[tokio::test]
async fn test_retry_budget_exhausted() {
    let (backend, _dir, api) = setup().await;
    backend
        .state
        .seed_products(vec![sample_product("p-1", "Gold Bangle", "bangles")]);
    backend.state.fail_next("GET", "/api/products/p-1", 503, 10);

    let err = api
        .get_product(&ProductId::new("p-1"))
        .await
        .expect_err("every attempt failed");

    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    // Initial send plus three retries.
    assert_eq!(backend.state.hits("GET", "/api/products/p-1"), 4);
}

#[tokio::test]
async fn test_connection_refused_is_network_error_and_retried() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    // Port 1 is never listening.
    let mut config = ClientConfig::for_origin("http://127.0.0.1:1".parse().expect("url"));
    config.storage_path = dir.path().join("state.json");
    config.retry.base_delay = Duration::from_millis(5);
    let api = StorefrontApi::new(&config).expect("api client");

    let started = std::time::Instant::now();
    let err = api
        .get_product(&ProductId::new("p-1"))
        .await
        .expect_err("nothing is listening");

    assert!(matches!(err, ApiError::Network(_)));
    assert!(err.status().is_none());
    // No-response failures are retried: the full backoff schedule
    // (10 + 20 + 40 ms at a 5 ms base) elapsed before the error surfaced.
    assert!(started.elapsed() >= Duration::from_millis(70));
}

#[tokio::test]
async fn test_server_detail_wins_message_precedence() {
    let (backend, _dir, api) = setup().await;
    backend.state.fail_next_with(
        "POST",
        "/api/contact",
        400,
        1,
        json!({"detail": "Invalid phone", "message": "ignored"}),
    );

    let err = api.submit_contact(&contact_form()).await.expect_err("rejected");

    assert_eq!(
        user_message(&err, Some("Could not send your message")),
        "Invalid phone"
    );
}

#[tokio::test]
async fn test_fallback_message_when_body_says_nothing() {
    let (backend, _dir, api) = setup().await;
    backend
        .state
        .fail_next_with("POST", "/api/contact", 400, 1, json!({}));

    let err = api.submit_contact(&contact_form()).await.expect_err("rejected");

    assert_eq!(
        user_message(&err, Some("Could not send your message")),
        "Could not send your message"
    );
}

#[tokio::test]
async fn test_retried_request_is_identical() {
    let (backend, _dir, api) = setup().await;
    backend
        .state
        .seed_products(vec![sample_product("p-2", "Classic Ring", "rings")]);
    backend.state.fail_next("GET", "/api/products", 500, 1);

    // The resend carries the same query, so the filtered listing still
    // matches after the retry.
    let filters = golden_era_client::api::ProductFilters::category("rings");
    let page = api.list_products(&filters).await.expect("retried listing");

    assert_eq!(page.products.len(), 1);
    assert_eq!(page.products[0].id, ProductId::new("p-2"));
    assert_eq!(backend.state.hits("GET", "/api/products"), 2);
}
