//! Read cache with request coalescing, and the mutation path that
//! invalidates it.
//!
//! # Purpose
//! Each read endpoint maps to a [`QueryKey`]. The first `query` for a key
//! runs the fetcher; concurrent queries for the same key wait on the
//! in-flight fetch instead of issuing their own. Mutations always run,
//! exactly once each, and mark their declared keys stale only after the
//! server confirms success.
//!
//! # Key invariants
//! - At most one fetch per key is in flight at any moment.
//! - Fetches run on a detached task, so a caller that gives up waiting
//!   does not cancel the fetch for everyone else.
//! - A failed mutation invalidates nothing.
//! - Stored errors are replayed to every waiter of the failed fetch; the
//!   next `query` after that retries.
use hms_api::{ApiError, ApiResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, watch};

/// Canonical identity of one read endpoint plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

enum Entry {
    Loading {
        done: watch::Receiver<bool>,
    },
    Ready {
        value: Arc<serde_json::Value>,
        fetched_at: Instant,
        stale: bool,
    },
    Failed {
        error: ApiError,
    },
}

enum Action {
    Hit(Arc<serde_json::Value>),
    Wait(watch::Receiver<bool>),
    Fetch(watch::Sender<bool>),
}

/// Cheaply cloneable; clones share the same entries.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, or run `fetcher` to produce it.
    /// Concurrent callers for the same key share one fetch; its result
    /// (success or error) is delivered to all of them.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> ApiResult<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        loop {
            let action = {
                let mut entries = self.entries.lock().await;
                match entries.get(&key) {
                    Some(Entry::Ready { value, stale: false, .. }) => Action::Hit(Arc::clone(value)),
                    // A loading entry whose sender is gone means the fetch
                    // task died; fall through and reclaim the key.
                    Some(Entry::Loading { done }) if done.has_changed().is_ok() => {
                        Action::Wait(done.clone())
                    }
                    _ => {
                        // Claim the key in the same critical section that
                        // decided to fetch. Releasing the lock first would
                        // let a second caller observe no entry and start a
                        // duplicate fetch.
                        let (tx, rx) = watch::channel(false);
                        entries.insert(key.clone(), Entry::Loading { done: rx });
                        Action::Fetch(tx)
                    }
                }
            };
            match action {
                Action::Hit(value) => return decode(&key, &value),
                Action::Wait(mut done) => {
                    while !*done.borrow() {
                        if done.changed().await.is_err() {
                            break;
                        }
                    }
                    // Re-inspect: the entry is now Ready, Failed, or was
                    // reclaimed by another fetch.
                    let entries = self.entries.lock().await;
                    match entries.get(&key) {
                        Some(Entry::Ready { value, stale: false, .. }) => {
                            let value = Arc::clone(value);
                            drop(entries);
                            return decode(&key, &value);
                        }
                        Some(Entry::Failed { error }) => return Err(error.clone()),
                        _ => continue,
                    }
                }
                Action::Fetch(claim) => return self.run_fetch(key, claim, fetcher()).await,
            }
        }
    }

    // The caller has already inserted the Loading entry whose receiver
    // pairs with `claim`.
    async fn run_fetch<T>(
        &self,
        key: QueryKey,
        claim: watch::Sender<bool>,
        fut: impl Future<Output = ApiResult<T>> + Send + 'static,
    ) -> ApiResult<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        tracing::debug!(key = %key, "fetching query");
        let entries = Arc::clone(&self.entries);
        let task_key = key.clone();
        // Detached so the fetch outlives a caller that stops waiting.
        let handle = tokio::spawn(async move {
            let result = fut.await;
            let entry = match &result {
                Ok(value) => match serde_json::to_value(value) {
                    Ok(json) => Entry::Ready {
                        value: Arc::new(json),
                        fetched_at: Instant::now(),
                        stale: false,
                    },
                    Err(err) => Entry::Failed {
                        error: ApiError::Transport(format!("encode cached value: {err}")),
                    },
                },
                Err(error) => Entry::Failed {
                    error: error.clone(),
                },
            };
            entries.lock().await.insert(task_key, entry);
            // Entry is committed before waiters are released.
            let _ = claim.send(true);
            result
        });
        match handle.await {
            Ok(result) => result,
            Err(err) => Err(ApiError::Transport(format!("query task failed: {err}"))),
        }
    }

    /// Run a mutation, then mark the listed keys stale if it succeeded.
    /// Mutations are never coalesced; every call reaches the server.
    pub async fn mutate<T>(
        &self,
        action: impl Future<Output = ApiResult<T>>,
        invalidates: &[QueryKey],
    ) -> ApiResult<T> {
        let result = action.await;
        if result.is_ok() {
            for key in invalidates {
                self.invalidate(key).await;
            }
        }
        result
    }

    /// Mark a key stale; the next `query` for it refetches. The stale
    /// value stays readable through `status` until then.
    pub async fn invalidate(&self, key: &QueryKey) {
        let mut entries = self.entries.lock().await;
        if let Some(Entry::Ready { stale, .. }) = entries.get_mut(key) {
            tracing::debug!(key = %key, "invalidating cached query");
            *stale = true;
        }
    }

    pub async fn status(&self, key: &QueryKey) -> QueryStatus {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            None => QueryStatus::Idle,
            Some(Entry::Loading { .. }) => QueryStatus::Loading,
            Some(Entry::Ready { .. }) => QueryStatus::Success,
            Some(Entry::Failed { .. }) => QueryStatus::Error,
        }
    }

    pub async fn fetched_at(&self, key: &QueryKey) -> Option<Instant> {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            Some(Entry::Ready { fetched_at, .. }) => Some(*fetched_at),
            _ => None,
        }
    }
}

fn decode<T: DeserializeOwned>(key: &QueryKey, value: &serde_json::Value) -> ApiResult<T> {
    serde_json::from_value(value.clone())
        .map_err(|err| ApiError::Transport(format!("decode cached value for {key}: {err}")))
}
