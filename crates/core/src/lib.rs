//! Golden Era Core - Shared types library.
//!
//! This crate provides the common types used across the Golden Era client
//! components:
//! - `client` - API access layer (HTTP, stores, search)
//! - `integration-tests` - end-to-end tests and the mock backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Everything
//! here mirrors the wire format of the catalog/order backend (camelCase JSON,
//! string UUIDs for entity identity).
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, catalog entities, cart/wishlist lines,
//!   suggestions, and lead submission payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
