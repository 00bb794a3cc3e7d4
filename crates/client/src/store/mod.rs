//! Shared cart/wishlist stores.
//!
//! Each store is an explicit, injected object owning one collection for one
//! user, synchronized with the backend by read-after-write: every mutation
//! POSTs/PUTs/DELETEs and then unconditionally refetches the full
//! collection. This trades an extra round trip for consistency - cart and
//! wishlist mutations are low-frequency, user-paced actions, and always
//! refetching eliminates the whole class of client/server drift bugs an
//! optimistic patch would invite. An optimistic variant would need
//! version/conflict tracking on every line.
//!
//! Snapshots are published through a `tokio::sync::watch` channel: the
//! collection is replaced wholesale on every successful fetch, so readers
//! always observe either the prior or the new snapshot, never a torn one.
//! Overlapping operations are allowed; across independently triggered
//! mutations the store simply reflects whichever refetch resolves last.
//!
//! Fetch failures soft-fail: the collection resets to empty and the error is
//! only logged, so the user sees an empty shell rather than an error screen.
//! Mutation failures surface one normalized notification and return `false`,
//! leaving the previous snapshot untouched (there is no optimistic state to
//! roll back).

mod cart;
mod wishlist;

pub use cart::CartStore;
pub use wishlist::WishlistStore;

/// Lifecycle of a store's collection.
///
/// `Ready` is re-entered after every mutation; there is no distinct
/// "mutating" phase exposed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorePhase {
    /// No fetch has started yet.
    #[default]
    Uninitialized,
    /// First fetch in flight.
    Loading,
    /// A fetch has completed (successfully or not).
    Ready,
}

/// The store's current in-memory value of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    pub phase: StorePhase,
    pub items: Vec<T>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            phase: StorePhase::Uninitialized,
            items: Vec::new(),
        }
    }
}

impl<T> Snapshot<T> {
    fn ready(items: Vec<T>) -> Self {
        Self {
            phase: StorePhase::Ready,
            items,
        }
    }
}
