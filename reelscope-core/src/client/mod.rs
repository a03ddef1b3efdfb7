//! Catalog access.
//!
//! Components only see [`CatalogApi`]; [`TmdbClient`] is the HTTP
//! implementation and tests substitute scripted fakes.

mod tmdb;
pub(crate) mod wire;

use async_trait::async_trait;
use reelscope_model::{GenreInfo, ListName, MediaDetail, MediaKind, PaginationPayload};
use tokio_util::sync::CancellationToken;

use crate::error::FetchResult;

pub use tmdb::TmdbClient;

/// Read-only catalog operations.
///
/// Every call is issued in the language of the client's locale at call
/// time. A cancelled token makes the call return
/// [`FetchError::Cancelled`](crate::FetchError::Cancelled) as soon as it is
/// observed.
#[async_trait]
pub trait CatalogApi: Send + Sync + std::fmt::Debug {
    /// One page of a named list. `page` starts at 1.
    async fn fetch_list(
        &self,
        list: ListName,
        page: u32,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<PaginationPayload>;

    /// Full record for one title or person, with cast, videos and related
    /// titles.
    async fn fetch_detail(
        &self,
        kind: MediaKind,
        id: u64,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<MediaDetail>;

    /// Free-text search across movies, series and people.
    async fn search(
        &self,
        query: &str,
        page: u32,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<PaginationPayload>;

    async fn fetch_genres(
        &self,
        kind: MediaKind,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<Vec<GenreInfo>>;
}
