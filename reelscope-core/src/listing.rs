//! Browsable, paginated lists: the movie tabs and full search results.

use std::sync::Arc;

use reelscope_model::{ListName, MediaItem, MediaKind};
use thiserror::Error;
use tracing::debug;

use crate::client::CatalogApi;
use crate::coordinator::{Outcome, QueryKey, RequestCoordinator, normalize_query};
use crate::error::FetchError;
use crate::observable::{Observable, Subscription};

/// What a paginated list shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListSource {
    Catalog(ListName),
    Search(String),
}

impl ListSource {
    /// Tab identity; page changes within a tab supersede each other.
    pub fn tab_id(&self) -> String {
        match self {
            ListSource::Catalog(list) => format!("list:{}", list.slug()),
            ListSource::Search(query) => {
                format!("results:{}", normalize_query(query))
            }
        }
    }

    fn is_blank_search(&self) -> bool {
        matches!(self, ListSource::Search(query) if query.trim().is_empty())
    }

    fn key(&self) -> QueryKey {
        QueryKey::new(self.tab_id())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListStatus {
    Idle,
    Loading,
    Ready,
    Failed(FetchError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    pub source: Option<ListSource>,
    /// Page requested last; stays put when that request fails.
    pub current_page: u32,
    /// Zero until the first page of the source has loaded.
    pub total_pages: u32,
    pub total_results: u64,
    /// Empty while loading or failed.
    pub items: Vec<MediaItem>,
    pub status: ListStatus,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            source: None,
            current_page: 1,
            total_pages: 0,
            total_results: 0,
            items: Vec::new(),
            status: ListStatus::Idle,
        }
    }
}

impl PaginationState {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.status == ListStatus::Loading
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("no list selected")]
    NoListSelected,
    #[error("page {requested} is outside 1..={total_pages}")]
    OutOfRange { requested: u32, total_pages: u32 },
}

/// State of one browsable list. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct PaginatedListState {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: Arc<dyn CatalogApi>,
    coordinator: RequestCoordinator,
    include_people: bool,
    state: Observable<PaginationState>,
}

impl PaginatedListState {
    pub fn new(client: Arc<dyn CatalogApi>, coordinator: RequestCoordinator) -> Self {
        Self::with_people(client, coordinator, false)
    }

    /// `include_people` keeps person entries in search-backed lists.
    pub fn with_people(
        client: Arc<dyn CatalogApi>,
        coordinator: RequestCoordinator,
        include_people: bool,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                coordinator,
                include_people,
                state: Observable::default(),
            }),
        }
    }

    pub fn subscribe(&self) -> Subscription<PaginationState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> PaginationState {
        self.inner.state.snapshot()
    }

    /// Switch to `source` and load its first page. An in-flight fetch for
    /// the previous tab is discarded.
    ///
    /// A blank search query is never sent; the list goes back to idle.
    pub async fn select_tab(&self, source: ListSource) -> Outcome<()> {
        if source.is_blank_search() {
            debug!("blank search query; clearing results");
            self.reset();
            return Outcome::Delivered(Ok(()));
        }
        let previous = self.inner.state.read(|state| state.source.clone());
        if let Some(previous) = previous.filter(|previous| previous.key() != source.key()) {
            self.inner.coordinator.cancel(&previous.key());
        }

        self.inner.state.set(PaginationState {
            source: Some(source.clone()),
            status: ListStatus::Loading,
            ..PaginationState::default()
        });
        self.fetch(source, 1).await
    }

    /// Load page `page` of the current source.
    ///
    /// Rejected without any state change or request when no page count is
    /// known yet or `page` lies outside `1..=total_pages`.
    pub async fn go_to_page(&self, page: u32) -> Result<Outcome<()>, PageError> {
        let (source, total_pages) = self
            .inner
            .state
            .read(|state| (state.source.clone(), state.total_pages));
        let source = source.ok_or(PageError::NoListSelected)?;
        if page < 1 || page > total_pages {
            return Err(PageError::OutOfRange {
                requested: page,
                total_pages,
            });
        }

        self.begin_loading(page);
        Ok(self.fetch(source, page).await)
    }

    pub async fn next_page(&self) -> Result<Outcome<()>, PageError> {
        let page = self.inner.state.read(|state| state.current_page);
        self.go_to_page(page.saturating_add(1)).await
    }

    pub async fn previous_page(&self) -> Result<Outcome<()>, PageError> {
        let page = self.inner.state.read(|state| state.current_page);
        self.go_to_page(page.saturating_sub(1)).await
    }

    /// Re-request the current page, typically after a failure.
    pub async fn retry(&self) -> Result<Outcome<()>, PageError> {
        let (source, page) = self
            .inner
            .state
            .read(|state| (state.source.clone(), state.current_page));
        let source = source.ok_or(PageError::NoListSelected)?;
        self.begin_loading(page);
        Ok(self.fetch(source, page).await)
    }

    /// Drop everything, including any in-flight fetch.
    pub fn reset(&self) {
        let source = self.inner.state.read(|state| state.source.clone());
        if let Some(source) = source {
            self.inner.coordinator.cancel(&source.key());
        }
        self.inner.state.set(PaginationState::default());
    }

    fn begin_loading(&self, page: u32) {
        self.inner.state.update(|state| {
            state.current_page = page;
            state.items.clear();
            state.status = ListStatus::Loading;
        });
    }

    async fn fetch(&self, source: ListSource, page: u32) -> Outcome<()> {
        let inner = &self.inner;
        let client = inner.client.clone();
        let request = source.clone();
        let drop_people = matches!(source, ListSource::Search(_)) && !inner.include_people;
        debug!(tab = %source.tab_id(), page, "loading list page");

        inner
            .coordinator
            .issue_with(
                source.key(),
                |token| async move {
                    match &request {
                        ListSource::Catalog(list) => {
                            client.fetch_list(*list, page, Some(&token)).await
                        }
                        ListSource::Search(query) => {
                            client.search(query, page, Some(&token)).await
                        }
                    }
                },
                |result| {
                    let mut outcome = Ok(());
                    inner.state.update_if(|state| {
                        if state.source.as_ref() != Some(&source) {
                            return false;
                        }
                        match result {
                            Ok(mut payload) => {
                                if drop_people {
                                    payload.items.retain(|item| item.kind != MediaKind::Person);
                                }
                                state.current_page = page;
                                state.total_pages = payload.total_pages;
                                state.total_results = payload.total_results;
                                state.items = payload.items;
                                state.status = ListStatus::Ready;
                            }
                            Err(err) => {
                                debug!(tab = %source.tab_id(), page, error = %err, "list page failed");
                                state.items.clear();
                                state.status = ListStatus::Failed(err.clone());
                                outcome = Err(err);
                            }
                        }
                        true
                    });
                    outcome
                },
            )
            .await
            .into()
    }
}
