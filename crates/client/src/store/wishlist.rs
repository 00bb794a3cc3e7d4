//! The wishlist store.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, instrument};

use golden_era_core::{ProductId, UserId, WishlistEntry, WishlistItemId};

use crate::api::StorefrontApi;
use crate::error::{SharedNotifier, report_failure};

use super::{Snapshot, StorePhase};

/// Source of truth for the current user's wishlist.
///
/// Same lifecycle as the cart store, minus quantities, plus the pure
/// [`contains`](Self::contains) membership check views use to render the
/// heart icon.
#[derive(Clone)]
pub struct WishlistStore {
    inner: Arc<WishlistStoreInner>,
}

struct WishlistStoreInner {
    api: StorefrontApi,
    user: UserId,
    notifier: SharedNotifier,
    tx: watch::Sender<Snapshot<WishlistEntry>>,
}

impl WishlistStore {
    /// Create a store for `user`'s wishlist.
    #[must_use]
    pub fn new(api: StorefrontApi, user: UserId, notifier: SharedNotifier) -> Self {
        let (tx, _rx) = watch::channel(Snapshot::default());
        Self {
            inner: Arc::new(WishlistStoreInner {
                api,
                user,
                notifier,
                tx,
            }),
        }
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<WishlistEntry>> {
        self.inner.tx.subscribe()
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<WishlistEntry> {
        self.inner.tx.borrow().clone()
    }

    /// Pure, synchronous membership check against the current snapshot.
    /// No network call.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.inner
            .tx
            .borrow()
            .items
            .iter()
            .any(|entry| &entry.product_id == product_id)
    }

    /// Refetch the full wishlist. Soft-fails like the cart fetch.
    #[instrument(skip(self))]
    pub async fn fetch(&self) {
        if self.inner.tx.borrow().phase == StorePhase::Uninitialized {
            self.inner.tx.send_replace(Snapshot {
                phase: StorePhase::Loading,
                items: Vec::new(),
            });
        }

        match self.inner.api.wishlist(&self.inner.user).await {
            Ok(items) => {
                self.inner.tx.send_replace(Snapshot::ready(items));
            }
            Err(err) => {
                error!(error = %err, "wishlist fetch failed, resetting to empty");
                self.inner.tx.send_replace(Snapshot::ready(Vec::new()));
            }
        }
    }

    /// Add a product, then refetch.
    #[instrument(skip(self), fields(product = %product_id))]
    pub async fn add(&self, product_id: &ProductId) -> bool {
        match self
            .inner
            .api
            .add_wishlist_entry(&self.inner.user, product_id)
            .await
        {
            Ok(()) => {
                self.fetch().await;
                true
            }
            Err(err) => {
                report_failure(
                    self.inner.notifier.as_ref(),
                    &err,
                    Some("Could not add to wishlist"),
                );
                false
            }
        }
    }

    /// Remove an entry, then refetch.
    #[instrument(skip(self), fields(item = %item))]
    pub async fn remove(&self, item: &WishlistItemId) -> bool {
        match self.inner.api.remove_wishlist_entry(item).await {
            Ok(()) => {
                self.fetch().await;
                true
            }
            Err(err) => {
                report_failure(
                    self.inner.notifier.as_ref(),
                    &err,
                    Some("Could not remove from wishlist"),
                );
                false
            }
        }
    }
}
