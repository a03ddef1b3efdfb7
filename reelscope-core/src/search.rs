//! Search-as-you-type.
//!
//! Every keystroke restarts a quiet-period timer; only when input has been
//! stable for the debounce window is a search issued, keyed by the
//! normalized query. Results for input that is no longer current are
//! dropped.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use reelscope_config::SearchConfig;
use reelscope_model::MediaItem;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::client::CatalogApi;
use crate::coordinator::{QueryKey, RequestCoordinator};
use crate::error::FetchError;
use crate::observable::{Observable, Subscription};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    Idle,
    /// Waiting for the input to settle.
    Pending,
    Searching,
    Resolved,
    Failed(FetchError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot {
    /// Raw input as typed.
    pub input: String,
    /// Trimmed query the current phase refers to.
    pub query: Option<String>,
    pub phase: SearchPhase,
    /// Top suggestions for `query`; empty unless resolved.
    pub results: Vec<MediaItem>,
    pub total_results: u64,
    key: Option<QueryKey>,
}

impl Default for SearchSnapshot {
    fn default() -> Self {
        Self {
            input: String::new(),
            query: None,
            phase: SearchPhase::Idle,
            results: Vec::new(),
            total_results: 0,
            key: None,
        }
    }
}

impl SearchSnapshot {
    pub fn is_idle(&self) -> bool {
        self.phase == SearchPhase::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_query_chars: usize,
    pub suggestion_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: config.debounce,
            min_query_chars: config.min_query_chars.max(1),
            suggestion_limit: config.suggestion_limit.max(1),
        }
    }
}

/// Live search component. Cheap to clone; clones share state.
///
/// [`input`](Self::input) spawns the debounce timer, so it must be called
/// from within a Tokio runtime.
#[derive(Debug, Clone)]
pub struct DebouncedSearch {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: Arc<dyn CatalogApi>,
    coordinator: RequestCoordinator,
    settings: SearchSettings,
    state: Observable<SearchSnapshot>,
    timer: Mutex<Option<JoinHandle<()>>>,
    active_key: Mutex<Option<QueryKey>>,
}

impl DebouncedSearch {
    pub fn new(
        client: Arc<dyn CatalogApi>,
        coordinator: RequestCoordinator,
        settings: SearchSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                coordinator,
                settings,
                state: Observable::default(),
                timer: Mutex::new(None),
                active_key: Mutex::new(None),
            }),
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.inner.settings
    }

    pub fn subscribe(&self) -> Subscription<SearchSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.state.snapshot()
    }

    /// Feed the current contents of the search box.
    pub fn input(&self, text: &str) {
        let Some((query, key)) = self.accept(text) else {
            return;
        };

        self.inner.state.update(|state| {
            state.input = text.to_string();
            state.query = Some(query.clone());
            state.key = Some(key.clone());
            state.phase = SearchPhase::Pending;
            state.results.clear();
            state.total_results = 0;
        });

        let this = self.clone();
        let debounce = self.inner.settings.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            this.fire(query, key).await;
        });
        self.replace_timer(Some(handle));
    }

    /// Search for `text` right away, skipping the quiet period.
    pub async fn submit(&self, text: &str) {
        let Some((query, key)) = self.accept(text) else {
            return;
        };
        self.inner.state.update(|state| {
            state.input = text.to_string();
            state.query = Some(query.clone());
            state.key = Some(key.clone());
            state.phase = SearchPhase::Pending;
            state.results.clear();
            state.total_results = 0;
        });
        self.replace_timer(None);
        self.fire(query, key).await;
    }

    /// Back to idle: no timer, no request, no results.
    pub fn clear(&self) {
        self.replace_timer(None);
        if let Some(key) = self.inner.active_key.lock().take() {
            self.inner.coordinator.cancel(&key);
        }
        self.inner.state.set(SearchSnapshot::default());
    }

    /// Shared validation for [`input`](Self::input) and
    /// [`submit`](Self::submit). Returns `None` when nothing should be
    /// scheduled.
    fn accept(&self, text: &str) -> Option<(String, QueryKey)> {
        let query = text.trim();
        if query.chars().count() < self.inner.settings.min_query_chars {
            self.replace_timer(None);
            if let Some(key) = self.inner.active_key.lock().take() {
                self.inner.coordinator.cancel(&key);
            }
            self.inner.state.set(SearchSnapshot {
                input: text.to_string(),
                ..SearchSnapshot::default()
            });
            return None;
        }

        let key = QueryKey::search(query);
        // Coordinator lock is taken outside the state borrow; deliveries
        // acquire them in the opposite order.
        let in_flight = self.inner.coordinator.is_in_flight(&key);
        let unchanged = self.inner.state.read(|state| {
            state.key.as_ref() == Some(&key)
                && match state.phase {
                    SearchPhase::Resolved => true,
                    SearchPhase::Searching => in_flight,
                    _ => false,
                }
        });
        if unchanged {
            trace!(%key, "query unchanged; not reissuing");
            self.inner.state.update_if(|state| {
                if state.input == text {
                    return false;
                }
                state.input = text.to_string();
                true
            });
            return None;
        }

        Some((query.to_string(), key))
    }

    fn replace_timer(&self, next: Option<JoinHandle<()>>) {
        let previous = std::mem::replace(&mut *self.inner.timer.lock(), next);
        if let Some(handle) = previous {
            handle.abort();
        }
    }

    async fn fire(&self, query: String, key: QueryKey) {
        let inner = &self.inner;
        let current = inner.state.update_if(|state| {
            if state.key.as_ref() != Some(&key) || state.phase != SearchPhase::Pending {
                return false;
            }
            state.phase = SearchPhase::Searching;
            true
        });
        if !current {
            return;
        }

        let previous = inner.active_key.lock().replace(key.clone());
        if let Some(previous) = previous.filter(|previous| previous != &key) {
            inner.coordinator.cancel(&previous);
        }

        debug!(%key, "issuing search");
        let client = inner.client.clone();
        let limit = inner.settings.suggestion_limit;
        let state = &inner.state;
        let delivery_key = key.clone();

        inner
            .coordinator
            .issue_with(
                key,
                |token| async move { client.search(&query, 1, Some(&token)).await },
                |result| {
                    state.update_if(|state| {
                        if state.key.as_ref() != Some(&delivery_key) {
                            return false;
                        }
                        match result {
                            Ok(page) => {
                                state.total_results = page.total_results;
                                state.results = page.items;
                                state.results.truncate(limit);
                                state.phase = SearchPhase::Resolved;
                            }
                            Err(err) => {
                                debug!(key = %delivery_key, error = %err, "search failed");
                                state.results.clear();
                                state.total_results = 0;
                                state.phase = SearchPhase::Failed(err);
                            }
                        }
                        true
                    });
                },
            )
            .await;

        let mut active = inner.active_key.lock();
        if active.as_ref() == Some(&delivery_key) {
            *active = None;
        }
    }
}
