//! Golden Era Client - resilient API access layer for the storefront.
//!
//! This crate is the client-side boundary between storefront views and the
//! remote catalog/order backend. It owns the pieces with real design
//! decisions: failure handling, retry policy, shared state synchronization,
//! and debounced search. Presentation concerns (rendering, routing) live in
//! the consuming application.
//!
//! # Architecture
//!
//! - [`http`] - verb-shaped HTTP client with an explicit retry/backoff
//!   wrapper and bearer-token attachment
//! - [`error`] - tagged [`error::ApiError`] plus one-stop normalization into
//!   a user-facing message and notification
//! - [`api`] - typed endpoint surface ([`api::StorefrontApi`]) with cached
//!   catalog reads
//! - [`store`] - injected cart/wishlist stores publishing snapshots over
//!   watch channels (fire-and-refetch consistency model)
//! - [`search`] - debounced suggestion queries with last-input-wins
//!   semantics and a bounded recent-search history
//! - [`storage`] - durable client-local state (auth token, recent searches)
//!
//! # Example
//!
//! ```rust,no_run
//! use golden_era_client::{api::StorefrontApi, config::ClientConfig, store::CartStore};
//! use golden_era_client::error::default_notifier;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let api = StorefrontApi::new(&config)?;
//! let cart = CartStore::new(api.clone(), config.user_id.clone(), default_notifier());
//!
//! cart.fetch().await;
//! let added = cart.add("p-1".into(), None, None).await;
//! assert!(added || cart.snapshot().items.is_empty());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod search;
pub mod storage;
pub mod store;

#[cfg(test)]
mod testutil;

pub use api::StorefrontApi;
pub use config::ClientConfig;
pub use error::{ApiError, Notification, Notifier};
pub use search::SearchController;
pub use storage::LocalStorage;
pub use store::{CartStore, WishlistStore};
