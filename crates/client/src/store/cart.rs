//! The cart store.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, instrument};

use golden_era_core::{CartItemId, CartLine, NewCartLine, ProductId, Quantity, UserId};

use crate::api::StorefrontApi;
use crate::error::{SharedNotifier, report_failure};

use super::{Snapshot, StorePhase};

/// Source of truth for the current user's cart.
///
/// Cheap to clone; all clones publish into the same snapshot channel.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    api: StorefrontApi,
    user: UserId,
    notifier: SharedNotifier,
    tx: watch::Sender<Snapshot<CartLine>>,
}

impl CartStore {
    /// Create a store for `user`'s cart. No fetch is issued until
    /// [`fetch`](Self::fetch) is called.
    #[must_use]
    pub fn new(api: StorefrontApi, user: UserId, notifier: SharedNotifier) -> Self {
        let (tx, _rx) = watch::channel(Snapshot::default());
        Self {
            inner: Arc::new(CartStoreInner {
                api,
                user,
                notifier,
                tx,
            }),
        }
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<CartLine>> {
        self.inner.tx.subscribe()
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<CartLine> {
        self.inner.tx.borrow().clone()
    }

    /// Refetch the full cart.
    ///
    /// Soft-fails: a fetch error logs, resets the collection to empty, and
    /// still transitions to `Ready`.
    #[instrument(skip(self))]
    pub async fn fetch(&self) {
        if self.inner.tx.borrow().phase == StorePhase::Uninitialized {
            self.inner.tx.send_replace(Snapshot {
                phase: StorePhase::Loading,
                items: Vec::new(),
            });
        }

        match self.inner.api.cart(&self.inner.user).await {
            Ok(items) => {
                self.inner.tx.send_replace(Snapshot::ready(items));
            }
            Err(err) => {
                error!(error = %err, "cart fetch failed, resetting to empty");
                self.inner.tx.send_replace(Snapshot::ready(Vec::new()));
            }
        }
    }

    /// Add a product to the cart, then refetch.
    ///
    /// Returns `false` (after one user-facing notification) on failure.
    #[instrument(skip(self), fields(product = %product_id))]
    pub async fn add(
        &self,
        product_id: ProductId,
        quantity: Option<Quantity>,
        size: Option<String>,
    ) -> bool {
        let line = NewCartLine {
            product_id,
            quantity: quantity.unwrap_or(Quantity::ONE),
            size,
            user_id: self.inner.user.clone(),
        };

        match self.inner.api.add_cart_line(&line).await {
            Ok(()) => {
                self.fetch().await;
                true
            }
            Err(err) => {
                report_failure(
                    self.inner.notifier.as_ref(),
                    &err,
                    Some("Could not add to cart"),
                );
                false
            }
        }
    }

    /// Change a line's quantity, then refetch.
    ///
    /// The store does not clamp; coerce user input with
    /// [`Quantity::clamped`] before calling.
    #[instrument(skip(self), fields(item = %item))]
    pub async fn update_quantity(&self, item: &CartItemId, quantity: Quantity) -> bool {
        match self.inner.api.update_cart_line(item, quantity).await {
            Ok(()) => {
                self.fetch().await;
                true
            }
            Err(err) => {
                report_failure(
                    self.inner.notifier.as_ref(),
                    &err,
                    Some("Could not update cart"),
                );
                false
            }
        }
    }

    /// Remove a line, then refetch.
    #[instrument(skip(self), fields(item = %item))]
    pub async fn remove(&self, item: &CartItemId) -> bool {
        match self.inner.api.remove_cart_line(item).await {
            Ok(()) => {
                self.fetch().await;
                true
            }
            Err(err) => {
                report_failure(
                    self.inner.notifier.as_ref(),
                    &err,
                    Some("Could not remove from cart"),
                );
                false
            }
        }
    }

    /// Clear the cart server-side, then set the local snapshot to empty
    /// directly. No refetch: the expected result is already known.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> bool {
        match self.inner.api.clear_cart(&self.inner.user).await {
            Ok(()) => {
                self.inner.tx.send_replace(Snapshot::ready(Vec::new()));
                true
            }
            Err(err) => {
                report_failure(
                    self.inner.notifier.as_ref(),
                    &err,
                    Some("Could not clear cart"),
                );
                false
            }
        }
    }
}
