//! Landing-page rows and the weekly trending mix.

use std::sync::Arc;

use reelscope_model::{ListName, MediaItem, TimeWindow, TrendingFilter};
use tracing::debug;

use crate::client::CatalogApi;
use crate::coordinator::{Outcome, QueryKey, RequestCoordinator};
use crate::error::FetchError;
use crate::observable::{Observable, Subscription};

/// Titles featured in the home page hero carousel.
pub const HERO_COUNT: usize = 5;
/// Entries kept from the merged movie and series weekly trending lists.
pub const WEEKLY_MIX_LIMIT: usize = 40;

const HOME_KEY: &str = "home";
const WEEKLY_KEY: &str = "weekly";

#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(FetchError),
}

impl<T> Default for FeedStatus<T> {
    fn default() -> Self {
        FeedStatus::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HomeRows {
    pub hero: Vec<MediaItem>,
    pub trending_movies: Vec<MediaItem>,
    pub popular_movies: Vec<MediaItem>,
    pub trending_tv: Vec<MediaItem>,
    pub top_rated_movies: Vec<MediaItem>,
    pub now_playing_movies: Vec<MediaItem>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeeklySnapshot {
    pub filter: TrendingFilter,
    pub status: FeedStatus<Vec<MediaItem>>,
}

#[derive(Debug, Clone)]
pub struct HomeFeed {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: Arc<dyn CatalogApi>,
    coordinator: RequestCoordinator,
    home: Observable<FeedStatus<HomeRows>>,
    weekly: Observable<WeeklySnapshot>,
}

impl HomeFeed {
    pub fn new(client: Arc<dyn CatalogApi>, coordinator: RequestCoordinator) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                coordinator,
                home: Observable::default(),
                weekly: Observable::default(),
            }),
        }
    }

    pub fn subscribe_home(&self) -> Subscription<FeedStatus<HomeRows>> {
        self.inner.home.subscribe()
    }

    pub fn home(&self) -> FeedStatus<HomeRows> {
        self.inner.home.snapshot()
    }

    pub fn subscribe_weekly(&self) -> Subscription<WeeklySnapshot> {
        self.inner.weekly.subscribe()
    }

    pub fn weekly(&self) -> WeeklySnapshot {
        self.inner.weekly.snapshot()
    }

    /// Fetch the five home rows concurrently. Any failing row fails the
    /// whole feed.
    pub async fn load(&self) -> Outcome<()> {
        let inner = &self.inner;
        inner.home.set(FeedStatus::Loading);
        let client = inner.client.clone();

        inner
            .coordinator
            .issue_with(
                QueryKey::new(HOME_KEY),
                |token| async move {
                    let cancel = Some(&token);
                    let (trending, popular, trending_tv, top_rated, now_playing) = futures::try_join!(
                        client.fetch_list(ListName::TrendingMovies(TimeWindow::Day), 1, cancel),
                        client.fetch_list(ListName::PopularMovies, 1, cancel),
                        client.fetch_list(ListName::TrendingTv(TimeWindow::Week), 1, cancel),
                        client.fetch_list(ListName::TopRatedMovies, 1, cancel),
                        client.fetch_list(ListName::NowPlayingMovies, 1, cancel),
                    )?;
                    Ok::<_, FetchError>(HomeRows {
                        hero: trending.items.iter().take(HERO_COUNT).cloned().collect(),
                        trending_movies: trending.items,
                        popular_movies: popular.items,
                        trending_tv: trending_tv.items,
                        top_rated_movies: top_rated.items,
                        now_playing_movies: now_playing.items,
                    })
                },
                |result| publish(&inner.home, result),
            )
            .await
            .into()
    }

    /// Load the weekly trending list for `filter`. Switching filters
    /// supersedes the previous load.
    pub async fn weekly_trending(&self, filter: TrendingFilter) -> Outcome<()> {
        let inner = &self.inner;
        inner.weekly.set(WeeklySnapshot {
            filter,
            status: FeedStatus::Loading,
        });
        let client = inner.client.clone();
        debug!(filter = filter.as_str(), "loading weekly trending");

        inner
            .coordinator
            .issue_with(
                QueryKey::new(WEEKLY_KEY),
                |token| async move {
                    let cancel = Some(&token);
                    let movies = ListName::TrendingMovies(TimeWindow::Week);
                    let tv = ListName::TrendingTv(TimeWindow::Week);
                    match filter {
                        TrendingFilter::Movies => {
                            client.fetch_list(movies, 1, cancel).await.map(|page| page.items)
                        }
                        TrendingFilter::Tv => {
                            client.fetch_list(tv, 1, cancel).await.map(|page| page.items)
                        }
                        TrendingFilter::All => futures::try_join!(
                            client.fetch_list(movies, 1, cancel),
                            client.fetch_list(tv, 1, cancel),
                        )
                        .map(|(movies, tv)| {
                            merge_by_popularity(movies.items, tv.items, WEEKLY_MIX_LIMIT)
                        }),
                    }
                },
                |result| {
                    let mut outcome = Ok(());
                    inner.weekly.update_if(|state| {
                        if state.filter != filter {
                            return false;
                        }
                        state.status = match result {
                            Ok(items) => FeedStatus::Ready(items),
                            Err(err) => {
                                outcome = Err(err.clone());
                                FeedStatus::Failed(err)
                            }
                        };
                        true
                    });
                    outcome
                },
            )
            .await
            .into()
    }

    pub fn reset(&self) {
        self.inner.coordinator.cancel(&QueryKey::new(HOME_KEY));
        self.inner.coordinator.cancel(&QueryKey::new(WEEKLY_KEY));
        self.inner.home.set(FeedStatus::Idle);
        self.inner.weekly.set(WeeklySnapshot::default());
    }
}

fn publish<T: Clone>(
    cell: &Observable<FeedStatus<T>>,
    result: Result<T, FetchError>,
) -> Result<(), FetchError> {
    match result {
        Ok(value) => {
            cell.set(FeedStatus::Ready(value));
            Ok(())
        }
        Err(err) => {
            cell.set(FeedStatus::Failed(err.clone()));
            Err(err)
        }
    }
}

/// Concatenates both lists, most popular first, keeping at most `limit`.
pub fn merge_by_popularity(
    mut first: Vec<MediaItem>,
    second: Vec<MediaItem>,
    limit: usize,
) -> Vec<MediaItem> {
    first.extend(second);
    first.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    first.truncate(limit);
    first
}
