//! Latest-request-wins bookkeeping for every data-fetching component.
//!
//! Each logical query slot is identified by a [`QueryKey`]. Issuing a
//! request under a key cancels whatever was in flight for it, and a result
//! is only handed to its consumer if the request is still the one
//! registered for its key when it completes. Responses arriving out of order
//! can therefore never overwrite newer state.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::FetchResult;

/// Identity of a logical query slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Search slot for `query`. Casing and inner whitespace do not matter.
    pub fn search(query: &str) -> Self {
        Self(format!("search:{}", normalize_query(query)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trimmed, lowercased, whitespace-collapsed form of a search query.
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A registered request that has not delivered yet.
#[derive(Debug, Clone)]
pub struct InFlightRequest {
    pub key: QueryKey,
    pub sequence: u64,
    cancellation: CancellationToken,
}

/// What happened to an issued request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Result reached its consumer.
    Delivered(FetchResult<T>),
    /// A newer request, an explicit cancel or a reset took the slot first.
    Superseded,
}

impl<T> Outcome<T> {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Outcome::Superseded)
    }

    pub fn into_result(self) -> Option<FetchResult<T>> {
        match self {
            Outcome::Delivered(result) => Some(result),
            Outcome::Superseded => None,
        }
    }
}

impl<T> From<Option<FetchResult<T>>> for Outcome<T> {
    fn from(value: Option<FetchResult<T>>) -> Self {
        match value {
            Some(result) => Outcome::Delivered(result),
            None => Outcome::Superseded,
        }
    }
}

#[derive(Debug, Default)]
struct Registry {
    next_sequence: u64,
    in_flight: HashMap<QueryKey, InFlightRequest>,
}

impl Registry {
    fn is_current(&self, key: &QueryKey, sequence: u64) -> bool {
        self.in_flight
            .get(key)
            .is_some_and(|request| request.sequence == sequence)
    }
}

/// Shared by clone; all clones see the same registry.
#[derive(Debug, Clone, Default)]
pub struct RequestCoordinator {
    registry: Arc<Mutex<Registry>>,
}

impl RequestCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `op` as the latest request for `key`.
    pub async fn issue<T, F, Fut>(&self, key: QueryKey, op: F) -> Outcome<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = FetchResult<T>>,
    {
        self.issue_with(key, op, |result| result).await.into()
    }

    /// Run `op` as the latest request for `key` and hand its result to
    /// `deliver` if it is still current on completion.
    ///
    /// `deliver` runs while the registry lock is held, so no newer request
    /// can register between the staleness check and the state update. It
    /// must not call back into the coordinator.
    pub async fn issue_with<T, R, F, Fut, D>(
        &self,
        key: QueryKey,
        op: F,
        deliver: D,
    ) -> Option<R>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = FetchResult<T>>,
        D: FnOnce(FetchResult<T>) -> R,
    {
        let mut registration = self.register(key);
        let token = registration.token.clone();

        let completed = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = op(token.clone()) => Some(result),
        };

        let Some(result) = completed else {
            trace!(key = %registration.key, "request cancelled before completion");
            return None;
        };

        let mut registry = self.registry.lock();
        registration.finished = true;
        if !registry.is_current(&registration.key, registration.sequence) {
            debug!(
                key = %registration.key,
                sequence = registration.sequence,
                "dropping result of superseded request"
            );
            return None;
        }
        registry.in_flight.remove(&registration.key);
        Some(deliver(result))
    }

    /// Cancel the in-flight request for `key`, if any.
    pub fn cancel(&self, key: &QueryKey) -> bool {
        let removed = self.registry.lock().in_flight.remove(key);
        match removed {
            Some(request) => {
                debug!(%key, sequence = request.sequence, "request cancelled");
                request.cancellation.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every in-flight request. Returns how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<InFlightRequest> = self
            .registry
            .lock()
            .in_flight
            .drain()
            .map(|(_, request)| request)
            .collect();
        for request in &drained {
            request.cancellation.cancel();
        }
        if !drained.is_empty() {
            debug!(count = drained.len(), "cancelled all in-flight requests");
        }
        drained.len()
    }

    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.registry.lock().in_flight.contains_key(key)
    }

    pub fn in_flight_count(&self) -> usize {
        self.registry.lock().in_flight.len()
    }

    pub fn in_flight(&self) -> Vec<InFlightRequest> {
        let mut requests: Vec<_> =
            self.registry.lock().in_flight.values().cloned().collect();
        requests.sort_by_key(|request| request.sequence);
        requests
    }

    fn register(&self, key: QueryKey) -> Registration<'_> {
        let token = CancellationToken::new();
        let mut registry = self.registry.lock();
        registry.next_sequence += 1;
        let sequence = registry.next_sequence;

        let previous = registry.in_flight.insert(
            key.clone(),
            InFlightRequest {
                key: key.clone(),
                sequence,
                cancellation: token.clone(),
            },
        );
        drop(registry);

        if let Some(previous) = previous {
            debug!(
                %key,
                superseded = previous.sequence,
                sequence,
                "superseding in-flight request"
            );
            previous.cancellation.cancel();
        }

        Registration {
            coordinator: self,
            key,
            sequence,
            token,
            finished: false,
        }
    }
}

/// Unregisters a request whose future was dropped before completing.
struct Registration<'a> {
    coordinator: &'a RequestCoordinator,
    key: QueryKey,
    sequence: u64,
    token: CancellationToken,
    finished: bool,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut registry = self.coordinator.registry.lock();
        if registry.is_current(&self.key, self.sequence) {
            registry.in_flight.remove(&self.key);
        }
        drop(registry);
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use tokio::sync::oneshot;

    #[test]
    fn search_keys_ignore_case_and_spacing() {
        assert_eq!(QueryKey::search("  Batman "), QueryKey::search("batman"));
        assert_eq!(
            QueryKey::search("the  dark knight"),
            QueryKey::search("The Dark Knight")
        );
        assert_ne!(QueryKey::search("bat"), QueryKey::search("batman"));
    }

    #[tokio::test]
    async fn newer_request_supersedes_older_one() {
        let coordinator = RequestCoordinator::new();
        let key = QueryKey::new("list:popular");
        let (slow_tx, slow_rx) = oneshot::channel::<u32>();

        let first = {
            let coordinator = coordinator.clone();
            let key = key.clone();
            tokio::spawn(async move {
                coordinator
                    .issue(key, |_| async move {
                        // Ignores cancellation like a transport that cannot abort.
                        slow_rx.await.map_err(|_| FetchError::Cancelled)
                    })
                    .await
            })
        };
        tokio::task::yield_now().await;
        assert!(coordinator.is_in_flight(&key));

        let second = coordinator.issue(key.clone(), |_| async { Ok(2) }).await;
        assert_eq!(second, Outcome::Delivered(Ok(2)));

        let _ = slow_tx.send(1);
        assert!(first.await.unwrap().is_superseded());
        assert_eq!(coordinator.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_interfere() {
        let coordinator = RequestCoordinator::new();
        let a = coordinator.issue(QueryKey::new("a"), |_| async { Ok("a") });
        let b = coordinator.issue(QueryKey::new("b"), |_| async { Ok("b") });
        let (a, b) = tokio::join!(a, b);
        assert_eq!(a, Outcome::Delivered(Ok("a")));
        assert_eq!(b, Outcome::Delivered(Ok("b")));
    }

    #[tokio::test]
    async fn errors_are_delivered_when_current() {
        let coordinator = RequestCoordinator::new();
        let outcome = coordinator
            .issue::<(), _, _>(QueryKey::new("detail"), |_| async {
                Err(FetchError::NotFound("/movie/0".into()))
            })
            .await;
        assert_eq!(
            outcome,
            Outcome::Delivered(Err(FetchError::NotFound("/movie/0".into())))
        );
    }

    #[tokio::test]
    async fn cancel_all_releases_every_slot() {
        let coordinator = RequestCoordinator::new();
        let mut handles = Vec::new();
        for name in ["home", "detail", "search:bat"] {
            let coordinator = coordinator.clone();
            handles.push(tokio::spawn(async move {
                coordinator
                    .issue(QueryKey::new(name), |token| async move {
                        token.cancelled().await;
                        Err::<(), _>(FetchError::Cancelled)
                    })
                    .await
            }));
        }
        tokio::task::yield_now().await;
        assert_eq!(coordinator.in_flight_count(), 3);
        let sequences: Vec<u64> = coordinator
            .in_flight()
            .iter()
            .map(|request| request.sequence)
            .collect();
        assert!(sequences.windows(2).all(|pair| pair[0] < pair[1]));

        assert_eq!(coordinator.cancel_all(), 3);
        for handle in handles {
            assert!(handle.await.unwrap().is_superseded());
        }
        assert_eq!(coordinator.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn aborted_task_unregisters_its_request() {
        let coordinator = RequestCoordinator::new();
        let key = QueryKey::new("weekly");
        let handle = {
            let coordinator = coordinator.clone();
            let key = key.clone();
            tokio::spawn(async move {
                coordinator
                    .issue(key, |_| std::future::pending::<FetchResult<()>>())
                    .await
            })
        };
        tokio::task::yield_now().await;
        assert!(coordinator.is_in_flight(&key));

        handle.abort();
        let _ = handle.await;
        assert!(!coordinator.is_in_flight(&key));
    }
}
