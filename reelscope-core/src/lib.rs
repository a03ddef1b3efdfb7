//! Asynchronous data-fetching and view-state coordination for the Reelscope
//! catalog browser.
//!
//! Data flows from user input through [`search::DebouncedSearch`],
//! [`listing::PaginatedListState`], [`detail::DetailView`] or
//! [`feed::HomeFeed`], into the [`coordinator::RequestCoordinator`] and out to
//! a [`client::CatalogApi`] implementation. Results travel back along the
//! same path and are published through [`observable::Observable`] state that
//! a view layer subscribes to.

#![allow(missing_docs)]

pub mod client;
pub mod coordinator;
pub mod detail;
pub mod error;
pub mod feed;
pub mod listing;
pub mod locale;
pub mod observable;
pub mod preferences;
pub mod search;
pub mod session;

pub use client::{CatalogApi, TmdbClient};
pub use coordinator::{Outcome, QueryKey, RequestCoordinator};
pub use error::{FetchError, FetchErrorKind, FetchResult};
pub use locale::LocaleContext;
pub use observable::{Observable, Subscription};
pub use session::{CatalogSession, SessionError};

pub use reelscope_model as model;
