//! Debounced search queries and recent-search history.
//!
//! Converts raw keystrokes into rate-limited suggestion fetches with
//! last-input-wins semantics. Two mechanisms cooperate:
//!
//! 1. **Debounce**: each keystroke schedules a fetch after a quiet window
//!    (default 300 ms); a newer keystroke inside the window supersedes it, so
//!    superseded keystrokes never produce a request.
//! 2. **Sequence guard**: fetches already in flight are not aborted. Every
//!    issued fetch carries a monotonic sequence number, and a completion is
//!    applied only if its number is higher than everything applied so far,
//!    so a slow stale response can never overwrite a newer one.
//!
//! Submitted queries (explicit submit or suggestion click) are recorded in
//! the bounded recent-search history, persisted via [`LocalStorage`].
//! Navigation is the consumer's job; [`SearchAction`] is the boundary.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use golden_era_core::{ProductId, Suggestion, SuggestionKind};

use crate::api::StorefrontApi;
use crate::error::{Notification, SharedNotifier};
use crate::storage::LocalStorage;

/// What the view should do after a submit or suggestion selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Open the product detail view.
    ProductDetail(ProductId),
    /// Open the listing filtered to a category.
    CategoryListing(String),
    /// Open the listing filtered by a free-text search.
    Listing { query: String },
}

/// Debounced search query component.
///
/// Cheap to clone; clones share the debounce state and channels.
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<SearchInner>,
}

struct SearchInner {
    api: StorefrontApi,
    storage: Arc<LocalStorage>,
    notifier: SharedNotifier,
    debounce: Duration,
    /// Issue counter; bumped per keystroke.
    seq: AtomicU64,
    /// Highest sequence number whose result was applied.
    applied: AtomicU64,
    suggestions_tx: watch::Sender<Vec<Suggestion>>,
    recent_tx: watch::Sender<Vec<String>>,
}

impl SearchController {
    /// Create a controller sharing the API client's local storage, from
    /// which the recent-search list is rehydrated.
    #[must_use]
    pub fn new(api: StorefrontApi, notifier: SharedNotifier, debounce: Duration) -> Self {
        let storage = api.storage();
        let (suggestions_tx, _) = watch::channel(Vec::new());
        let (recent_tx, _) = watch::channel(storage.recent_searches());

        Self {
            inner: Arc::new(SearchInner {
                api,
                storage,
                notifier,
                debounce,
                seq: AtomicU64::new(0),
                applied: AtomicU64::new(0),
                suggestions_tx,
                recent_tx,
            }),
        }
    }

    // =========================================================================
    // Suggestions
    // =========================================================================

    /// Subscribe to the suggestion list.
    #[must_use]
    pub fn subscribe_suggestions(&self) -> watch::Receiver<Vec<Suggestion>> {
        self.inner.suggestions_tx.subscribe()
    }

    /// The current suggestion list.
    #[must_use]
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.inner.suggestions_tx.borrow().clone()
    }

    /// Feed one input change.
    ///
    /// Empty or whitespace-only input clears the suggestions immediately
    /// with no network call. Anything else schedules a fetch after the
    /// quiet window; only the last keystroke within the window fetches.
    #[instrument(skip(self, text))]
    pub fn input(&self, text: &str) {
        let query = text.trim().to_string();
        let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;

        if query.is_empty() {
            // The cleared state counts as an applied result so an in-flight
            // fetch from before the clear cannot resurrect old suggestions.
            Self::apply(&self.inner, seq, Vec::new());
            return;
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;

            // Superseded within the quiet window: never issue the request.
            if inner.seq.load(Ordering::SeqCst) != seq {
                return;
            }

            let suggestions = match inner.api.search_suggestions(&query).await {
                Ok(list) => list,
                Err(err) => {
                    debug!(error = %err, query = %query, "suggestion fetch failed");
                    Vec::new()
                }
            };
            Self::apply(&inner, seq, suggestions);
        });
    }

    /// Apply a completion only if nothing newer has been applied.
    fn apply(inner: &SearchInner, seq: u64, suggestions: Vec<Suggestion>) {
        let previous = inner.applied.fetch_max(seq, Ordering::SeqCst);
        if previous < seq {
            inner.suggestions_tx.send_replace(suggestions);
        } else {
            debug!(seq, previous, "discarding stale suggestion completion");
        }
    }

    /// Clear suggestions (modal closed, query consumed).
    fn clear_suggestions(&self) {
        let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
        Self::apply(&self.inner, seq, Vec::new());
    }

    // =========================================================================
    // Submit / select
    // =========================================================================

    /// Submit a query explicitly.
    ///
    /// Blank queries notify the user and return `None`. Otherwise the query
    /// is recorded in the recent-search history and the resulting navigation
    /// action is returned.
    pub fn submit(&self, query: &str) -> Option<SearchAction> {
        let query = query.trim();
        if query.is_empty() {
            self.inner
                .notifier
                .notify(Notification::error("Please enter a search query"));
            return None;
        }

        self.record_recent(query);
        self.clear_suggestions();
        Some(SearchAction::Listing {
            query: query.to_string(),
        })
    }

    /// Select a suggestion, branching on its kind.
    pub fn select(&self, suggestion: &Suggestion) -> Option<SearchAction> {
        match &suggestion.kind {
            SuggestionKind::Product { id, .. } => {
                self.record_recent(&suggestion.name);
                self.clear_suggestions();
                Some(SearchAction::ProductDetail(id.clone()))
            }
            SuggestionKind::Category { slug } => {
                self.record_recent(&suggestion.name);
                self.clear_suggestions();
                Some(SearchAction::CategoryListing(slug.clone()))
            }
            SuggestionKind::Term => self.submit(&suggestion.name),
        }
    }

    // =========================================================================
    // Recent searches
    // =========================================================================

    /// Subscribe to the recent-search list.
    #[must_use]
    pub fn subscribe_recent(&self) -> watch::Receiver<Vec<String>> {
        self.inner.recent_tx.subscribe()
    }

    /// The current recent-search list, most-recent-first.
    #[must_use]
    pub fn recent_searches(&self) -> Vec<String> {
        self.inner.recent_tx.borrow().clone()
    }

    /// Drop the whole recent-search history.
    pub fn clear_recent_searches(&self) {
        if let Err(err) = self.inner.storage.clear_recent_searches() {
            warn!(error = %err, "failed to persist cleared recent searches");
        }
        self.inner.recent_tx.send_replace(Vec::new());
    }

    fn record_recent(&self, query: &str) {
        match self.inner.storage.push_recent_search(query) {
            Ok(updated) => {
                self.inner.recent_tx.send_replace(updated);
            }
            Err(err) => {
                // In-memory list still advanced; only persistence failed.
                warn!(error = %err, "failed to persist recent search");
                self.inner
                    .recent_tx
                    .send_replace(self.inner.storage.recent_searches());
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::testutil::RecordingNotifier;

    fn controller() -> (tempfile::TempDir, Arc<RecordingNotifier>, SearchController) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::for_origin("http://127.0.0.1:1".parse().unwrap());
        config.storage_path = dir.path().join("state.json");
        let api = StorefrontApi::new(&config).unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let search = SearchController::new(
            api,
            notifier.clone(),
            Duration::from_millis(20),
        );
        (dir, notifier, search)
    }

    #[tokio::test]
    async fn test_submit_records_recent_and_returns_listing() {
        let (_dir, _notifier, search) = controller();
        let action = search.submit("  gold ring  ");
        assert_eq!(
            action,
            Some(SearchAction::Listing {
                query: "gold ring".to_string()
            })
        );
        assert_eq!(search.recent_searches(), vec!["gold ring"]);
    }

    #[tokio::test]
    async fn test_blank_submit_notifies_and_aborts() {
        let (_dir, notifier, search) = controller();
        assert_eq!(search.submit("   "), None);
        assert!(search.recent_searches().is_empty());
        assert_eq!(notifier.notifications.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_select_branches_by_kind() {
        let (_dir, _notifier, search) = controller();

        let product = Suggestion {
            kind: SuggestionKind::Product {
                id: ProductId::new("p-1"),
                price: None,
            },
            name: "Gold Bangle".to_string(),
            category: None,
            image: None,
        };
        assert_eq!(
            search.select(&product),
            Some(SearchAction::ProductDetail(ProductId::new("p-1")))
        );

        let category = Suggestion {
            kind: SuggestionKind::Category {
                slug: "rings".to_string(),
            },
            name: "Rings".to_string(),
            category: None,
            image: None,
        };
        assert_eq!(
            search.select(&category),
            Some(SearchAction::CategoryListing("rings".to_string()))
        );

        let term = Suggestion::term("temple jewellery");
        assert_eq!(
            search.select(&term),
            Some(SearchAction::Listing {
                query: "temple jewellery".to_string()
            })
        );

        // Every selection landed in the recent history, newest first.
        assert_eq!(
            search.recent_searches(),
            vec!["temple jewellery", "Rings", "Gold Bangle"]
        );
    }

    #[tokio::test]
    async fn test_empty_input_clears_without_network() {
        let (_dir, _notifier, search) = controller();
        // No backend is listening; a network call would simply error, but
        // the cleared state must be immediate and synchronous.
        search.input("   ");
        assert!(search.suggestions().is_empty());
    }

    #[tokio::test]
    async fn test_stale_completion_discarded() {
        let (_dir, _notifier, search) = controller();
        // Newer sequence applied first; the older completion must not win.
        SearchController::apply(&search.inner, 2, vec![Suggestion::term("new")]);
        SearchController::apply(&search.inner, 1, vec![Suggestion::term("old")]);
        assert_eq!(search.suggestions(), vec![Suggestion::term("new")]);
    }

    #[tokio::test]
    async fn test_clear_recent_searches() {
        let (_dir, _notifier, search) = controller();
        search.submit("bangle");
        search.clear_recent_searches();
        assert!(search.recent_searches().is_empty());
        assert!(search.inner.storage.recent_searches().is_empty());
    }
}
