#![allow(dead_code)]

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reelscope_core::{CatalogApi, FetchError, FetchResult, LocaleContext};
use reelscope_model::{
    GenreInfo, ListName, MediaDetail, MediaItem, MediaKind, PaginationPayload,
};
use tokio::sync::{Notify, oneshot};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List { list: ListName, page: u32, language: String },
    Detail { kind: MediaKind, id: u64, language: String },
    Search { query: String, page: u32, language: String },
    Genres { kind: MediaKind, language: String },
}

impl Call {
    pub fn language(&self) -> &str {
        match self {
            Call::List { language, .. }
            | Call::Detail { language, .. }
            | Call::Search { language, .. }
            | Call::Genres { language, .. } => language,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Page(PaginationPayload),
    Detail(MediaDetail),
    Genres(Vec<GenreInfo>),
    Error(FetchError),
}

type Responder = Box<dyn Fn(&Call) -> Reply + Send + Sync>;

/// Catalog fake. Calls either block until the test answers them by index
/// or are answered immediately by a responder function.
pub struct ScriptedCatalog {
    locale: LocaleContext,
    calls: Mutex<Vec<Call>>,
    gates: Mutex<Vec<Option<oneshot::Sender<Reply>>>>,
    notify: Notify,
    responder: Option<Responder>,
}

impl fmt::Debug for ScriptedCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedCatalog")
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

impl ScriptedCatalog {
    pub fn gated(locale: LocaleContext) -> Arc<Self> {
        Arc::new(Self::build(locale, None))
    }

    pub fn answering(
        locale: LocaleContext,
        responder: impl Fn(&Call) -> Reply + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self::build(locale, Some(Box::new(responder))))
    }

    fn build(locale: LocaleContext, responder: Option<Responder>) -> Self {
        Self {
            locale,
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(Vec::new()),
            notify: Notify::new(),
            responder,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Waits (up to a generous bound) until at least `n` calls were made.
    pub async fn wait_for_calls(&self, n: usize) {
        let wait = async {
            loop {
                let notified = self.notify.notified();
                if self.call_count() >= n {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(Duration::from_secs(30), wait)
            .await
            .unwrap_or_else(|_| panic!("expected {n} calls, saw {}", self.call_count()));
    }

    /// Answers the gated call at `index`. Returns `false` if its caller is
    /// gone.
    pub fn respond(&self, index: usize, reply: Reply) -> bool {
        let gate = self
            .gates
            .lock()
            .get_mut(index)
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("no open call at index {index}"));
        gate.send(reply).is_ok()
    }

    async fn dispatch(&self, call: Call, cancel: Option<&CancellationToken>) -> Reply {
        if let Some(responder) = &self.responder {
            let reply = responder(&call);
            self.calls.lock().push(call);
            self.gates.lock().push(None);
            self.notify.notify_waiters();
            return reply;
        }

        let (tx, rx) = oneshot::channel();
        self.calls.lock().push(call);
        self.gates.lock().push(Some(tx));
        self.notify.notify_waiters();

        let never = CancellationToken::new();
        let token = cancel.unwrap_or(&never);
        tokio::select! {
            reply = rx => reply.unwrap_or(Reply::Error(FetchError::Cancelled)),
            _ = token.cancelled() => Reply::Error(FetchError::Cancelled),
        }
    }
}

#[async_trait]
impl CatalogApi for ScriptedCatalog {
    async fn fetch_list(
        &self,
        list: ListName,
        page: u32,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<PaginationPayload> {
        let call = Call::List {
            list,
            page,
            language: self.locale.current(),
        };
        match self.dispatch(call, cancel).await {
            Reply::Page(page) => Ok(page),
            Reply::Error(err) => Err(err),
            other => panic!("unexpected reply for list: {other:?}"),
        }
    }

    async fn fetch_detail(
        &self,
        kind: MediaKind,
        id: u64,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<MediaDetail> {
        let call = Call::Detail {
            kind,
            id,
            language: self.locale.current(),
        };
        match self.dispatch(call, cancel).await {
            Reply::Detail(detail) => Ok(detail),
            Reply::Error(err) => Err(err),
            other => panic!("unexpected reply for detail: {other:?}"),
        }
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<PaginationPayload> {
        let call = Call::Search {
            query: query.to_string(),
            page,
            language: self.locale.current(),
        };
        match self.dispatch(call, cancel).await {
            Reply::Page(page) => Ok(page),
            Reply::Error(err) => Err(err),
            other => panic!("unexpected reply for search: {other:?}"),
        }
    }

    async fn fetch_genres(
        &self,
        kind: MediaKind,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<Vec<GenreInfo>> {
        let call = Call::Genres {
            kind,
            language: self.locale.current(),
        };
        match self.dispatch(call, cancel).await {
            Reply::Genres(genres) => Ok(genres),
            Reply::Error(err) => Err(err),
            other => panic!("unexpected reply for genres: {other:?}"),
        }
    }
}

pub fn item(id: u64, kind: MediaKind, title: &str) -> MediaItem {
    MediaItem {
        id,
        kind,
        title: title.to_string(),
        overview: String::new(),
        poster_path: None,
        backdrop_path: None,
        release_date: None,
        vote_average: 7.0,
        popularity: id as f32,
    }
}

pub fn movie(id: u64, title: &str) -> MediaItem {
    item(id, MediaKind::Movie, title)
}

pub fn page_of(items: Vec<MediaItem>, page: u32, total_pages: u32) -> Reply {
    let total = items.len() as u64 * u64::from(total_pages);
    Reply::Page(PaginationPayload::new(page, total_pages, total, items))
}

/// `count` numbered movies titled after `prefix`.
pub fn movies(prefix: &str, count: u64) -> Vec<MediaItem> {
    (1..=count)
        .map(|i| movie(i, &format!("{prefix} {i}")))
        .collect()
}

pub fn detail(kind: MediaKind, id: u64, title: &str) -> MediaDetail {
    MediaDetail {
        item: item(id, kind, title),
        runtime_minutes: Some(120),
        genres: Vec::new(),
        cast: Vec::new(),
        director: None,
        trailer_key: None,
        vote_count: 10,
        season_count: None,
        episode_count: None,
        similar: Vec::new(),
        recommended: Vec::new(),
    }
}

/// Lets spawned tasks and pending wakeups run.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
