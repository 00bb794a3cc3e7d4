//! Core types for the Golden Era client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod lead;
pub mod order;
pub mod product;
pub mod search;
pub mod store;

pub use cart::{CartLine, NewCartLine, NewWishlistEntry, Quantity, QuantityError, WishlistEntry};
pub use id::*;
pub use lead::{AppointmentRequest, ContactForm, ExchangeLead};
pub use order::{Order, OrderDraft, OrderLine};
pub use product::{Availability, Product, ProductPage, StoneDetails};
pub use search::{Suggestion, SuggestionKind};
pub use store::Store;
