//! Wiring of every component around one client, coordinator and locale.

use std::sync::Arc;

use reelscope_config::ReelscopeConfig;
use reelscope_model::{GenreInfo, ImageSize, ListName, MediaKind, image_url};
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{CatalogApi, TmdbClient};
use crate::coordinator::{Outcome, RequestCoordinator};
use crate::detail::DetailView;
use crate::error::FetchResult;
use crate::feed::HomeFeed;
use crate::listing::{ListSource, PaginatedListState};
use crate::locale::LocaleContext;
use crate::preferences::{PreferenceError, PreferenceStore};
use crate::search::{DebouncedSearch, SearchSettings};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to build HTTP client")]
    HttpClient(#[from] reqwest::Error),
}

/// A browsing session.
///
/// Owns the shared [`RequestCoordinator`] and [`LocaleContext`]; every
/// component issues through them so a language change can cancel and reset
/// everything at once.
#[derive(Debug, Clone)]
pub struct CatalogSession {
    client: Arc<dyn CatalogApi>,
    locale: LocaleContext,
    coordinator: RequestCoordinator,
    preferences: Arc<PreferenceStore>,
    image_base_url: String,
    suggestions: DebouncedSearch,
    browser: PaginatedListState,
    results: PaginatedListState,
    detail: DetailView,
    home: HomeFeed,
}

impl CatalogSession {
    /// Session against the TMDB API, in the persisted language.
    pub fn from_config(config: &ReelscopeConfig) -> Result<Self, SessionError> {
        let preferences = Arc::new(PreferenceStore::from_config(&config.preferences));
        let locale = LocaleContext::new(preferences.language());
        let client = TmdbClient::new(&config.catalog, locale.clone())?;
        Ok(Self::with_parts(
            Arc::new(client),
            locale,
            preferences,
            config,
        ))
    }

    /// `locale` must be the context `client` issues requests with.
    pub fn with_parts(
        client: Arc<dyn CatalogApi>,
        locale: LocaleContext,
        preferences: Arc<PreferenceStore>,
        config: &ReelscopeConfig,
    ) -> Self {
        let coordinator = RequestCoordinator::new();
        Self {
            suggestions: DebouncedSearch::new(
                client.clone(),
                coordinator.clone(),
                SearchSettings::from(&config.search),
            ),
            browser: PaginatedListState::new(client.clone(), coordinator.clone()),
            results: PaginatedListState::with_people(
                client.clone(),
                coordinator.clone(),
                config.search.include_people,
            ),
            detail: DetailView::new(client.clone(), coordinator.clone()),
            home: HomeFeed::new(client.clone(), coordinator.clone()),
            client,
            image_base_url: config.catalog.image_base_url.clone(),
            locale,
            coordinator,
            preferences,
        }
    }

    pub fn language(&self) -> String {
        self.locale.current()
    }

    pub fn coordinator(&self) -> &RequestCoordinator {
        &self.coordinator
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    /// Search box suggestions.
    pub fn suggestions(&self) -> &DebouncedSearch {
        &self.suggestions
    }

    /// Movie browser tabs.
    pub fn browser(&self) -> &PaginatedListState {
        &self.browser
    }

    /// Full search results page.
    pub fn results(&self) -> &PaginatedListState {
        &self.results
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    pub fn home(&self) -> &HomeFeed {
        &self.home
    }

    pub async fn open_tab(&self, list: ListName) -> Outcome<()> {
        self.browser.select_tab(ListSource::Catalog(list)).await
    }

    /// Run a full search for `query` and remember it in the history.
    ///
    /// Blank input clears the results page and returns `None` without
    /// touching the network or the history.
    pub async fn submit_search(&self, query: &str) -> Option<Outcome<()>> {
        let query = query.trim();
        if query.is_empty() {
            self.results.reset();
            return None;
        }
        if let Err(err) = self.preferences.record_search(query) {
            warn!(error = %err, "could not persist search history");
        }
        Some(
            self.results
                .select_tab(ListSource::Search(query.to_string()))
                .await,
        )
    }

    /// Persist and apply a new language.
    ///
    /// Every in-flight request is cancelled and every component returns to
    /// its initial state so no result in the old language is ever shown.
    /// Returns `false` when `code` was already active.
    pub fn change_language(&self, code: &str) -> Result<bool, PreferenceError> {
        let code = match self.preferences.set_language(code) {
            Ok(code) => code,
            Err(PreferenceError::Storage(err)) => {
                warn!(error = %err, "language preference not persisted");
                self.preferences.language()
            }
            Err(err) => return Err(err),
        };

        if self.locale.current() == code {
            return Ok(false);
        }
        self.locale.replace(code.clone());
        let cancelled = self.coordinator.cancel_all();

        self.suggestions.clear();
        self.browser.reset();
        self.results.reset();
        self.detail.close();
        self.home.reset();
        info!(language = %code, cancelled, "language changed; session reset");
        Ok(true)
    }

    /// Genre names for `kind` in the active language.
    pub async fn genres(&self, kind: MediaKind) -> FetchResult<Vec<GenreInfo>> {
        self.client.fetch_genres(kind, None).await
    }

    /// Absolute image URL, or the placeholder for a missing path.
    pub fn image_url(&self, path: Option<&str>, size: ImageSize) -> String {
        image_url(&self.image_base_url, path, size)
    }
}
