use std::sync::Arc;

use reelscope_model::{MediaDetail, MediaKind};
use tracing::debug;

use crate::client::CatalogApi;
use crate::coordinator::{Outcome, QueryKey, RequestCoordinator};
use crate::error::FetchError;
use crate::observable::{Observable, Subscription};

const DETAIL_KEY: &str = "detail";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailStatus {
    Idle,
    Loading,
    Ready(Box<MediaDetail>),
    Failed(FetchError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSnapshot {
    pub target: Option<(MediaKind, u64)>,
    pub status: DetailStatus,
}

impl Default for DetailSnapshot {
    fn default() -> Self {
        Self {
            target: None,
            status: DetailStatus::Idle,
        }
    }
}

impl DetailSnapshot {
    pub fn detail(&self) -> Option<&MediaDetail> {
        match &self.status {
            DetailStatus::Ready(detail) => Some(detail),
            _ => None,
        }
    }
}

/// The single open detail page. Opening another title supersedes the
/// previous fetch.
#[derive(Debug, Clone)]
pub struct DetailView {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: Arc<dyn CatalogApi>,
    coordinator: RequestCoordinator,
    state: Observable<DetailSnapshot>,
}

impl DetailView {
    pub fn new(client: Arc<dyn CatalogApi>, coordinator: RequestCoordinator) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                coordinator,
                state: Observable::default(),
            }),
        }
    }

    pub fn subscribe(&self) -> Subscription<DetailSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> DetailSnapshot {
        self.inner.state.snapshot()
    }

    pub async fn open(&self, kind: MediaKind, id: u64) -> Outcome<()> {
        self.inner.state.set(DetailSnapshot {
            target: Some((kind, id)),
            status: DetailStatus::Loading,
        });
        self.load(kind, id).await
    }

    /// Reload the current target. `None` when nothing is open.
    pub async fn retry(&self) -> Option<Outcome<()>> {
        let (kind, id) = self.inner.state.read(|state| state.target)?;
        self.inner
            .state
            .update(|state| state.status = DetailStatus::Loading);
        Some(self.load(kind, id).await)
    }

    pub fn close(&self) {
        self.inner.coordinator.cancel(&QueryKey::new(DETAIL_KEY));
        self.inner.state.set(DetailSnapshot::default());
    }

    async fn load(&self, kind: MediaKind, id: u64) -> Outcome<()> {
        let inner = &self.inner;
        let client = inner.client.clone();
        debug!(%kind, id, "loading detail");

        inner
            .coordinator
            .issue_with(
                QueryKey::new(DETAIL_KEY),
                |token| async move { client.fetch_detail(kind, id, Some(&token)).await },
                |result| {
                    let mut outcome = Ok(());
                    inner.state.update_if(|state| {
                        if state.target != Some((kind, id)) {
                            return false;
                        }
                        state.status = match result {
                            Ok(detail) => DetailStatus::Ready(Box::new(detail)),
                            Err(err) => {
                                outcome = Err(err.clone());
                                DetailStatus::Failed(err)
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
}
