use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use jobboard_core::FilterCriteria;
use jobboard_logging::{board_debug, board_trace};
use tokio::sync::broadcast;

use crate::{ApiError, CachePolicy};

const EVENT_CAPACITY: usize = 64;

/// Deterministic identity of a query: operation name plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    operation: &'static str,
    params: String,
}

impl QueryKey {
    pub const FETCH_JOBS: &'static str = "fetch-jobs";
    pub const JOB: &'static str = "job";

    pub fn new(operation: &'static str, params: impl Into<String>) -> Self {
        Self {
            operation,
            params: params.into(),
        }
    }

    pub fn jobs(criteria: &FilterCriteria) -> Self {
        // Debug quoting keeps field boundaries unambiguous.
        let params = format!(
            "{:?}",
            (
                &criteria.search_term,
                criteria.job_type.as_str(),
                &criteria.location,
                &criteria.skills,
            )
        );
        Self::new(Self::FETCH_JOBS, params)
    }

    pub fn job(job_id: &str) -> Self {
        Self::new(Self::JOB, job_id)
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operation, self.params)
    }
}

/// Observable state of one key. Once loading ends exactly one of
/// `Error`/`Data` holds.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Idle,
    Loading,
    Error(ApiError),
    Data(T),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Idle
    }
}

impl<T> QueryState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            QueryState::Error(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Loading,
    Success,
    Failed(String),
}

/// Broadcast to subscribers on every state transition of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEvent {
    pub key: QueryKey,
    pub status: QueryStatus,
}

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, ApiError>>>;

struct InFlight<T> {
    id: u64,
    fetch: SharedFetch<T>,
    waiters: usize,
}

struct Entry<T> {
    state: QueryState<T>,
    stored_at: Option<Instant>,
}

struct Inner<T> {
    in_flight: HashMap<QueryKey, InFlight<T>>,
    entries: HashMap<QueryKey, Entry<T>>,
}

impl<T: Clone> Inner<T> {
    fn fresh(&self, key: &QueryKey, ttl: Option<Duration>) -> Option<T> {
        let ttl = ttl?;
        let entry = self.entries.get(key)?;
        match (&entry.state, entry.stored_at) {
            (QueryState::Data(data), Some(at)) if at.elapsed() <= ttl => Some(data.clone()),
            _ => None,
        }
    }
}

/// Query cache with at most one in-flight request per key.
///
/// Concurrent callers for the same key await one shared request. When every
/// caller of a pending request has gone away the request is dropped, which
/// cancels it.
pub struct QueryCache<T> {
    policy: CachePolicy,
    inner: Mutex<Inner<T>>,
    next_id: AtomicU64,
    events: broadcast::Sender<QueryEvent>,
}

impl<T> QueryCache<T> {
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, key: &QueryKey, status: QueryStatus) {
        board_trace!("query {} -> {:?}", key, status);
        // No receivers is fine.
        let _ = self.events.send(QueryEvent {
            key: key.clone(),
            status,
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.events.subscribe()
    }

    pub fn in_flight(&self) -> usize {
        self.lock().in_flight.len()
    }

    /// Drops stored data for `key`. A pending request is left alone.
    pub fn invalidate(&self, key: &QueryKey) {
        let mut inner = self.lock();
        if !inner.in_flight.contains_key(key) {
            inner.entries.remove(key);
        }
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        let Inner { in_flight, entries } = &mut *inner;
        entries.retain(|key, _| in_flight.contains_key(key));
    }
}

impl<T> QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(policy: CachePolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            policy,
            inner: Mutex::new(Inner {
                in_flight: HashMap::new(),
                entries: HashMap::new(),
            }),
            next_id: AtomicU64::new(1),
            events,
        }
    }

    pub fn state(&self, key: &QueryKey) -> QueryState<T> {
        self.lock()
            .entries
            .get(key)
            .map(|entry| entry.state.clone())
            .unwrap_or_default()
    }

    /// Serves fresh data for `key`, joins its pending request, or starts `fetch`.
    pub async fn get_or_fetch<F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (id, shared, started) = {
            let mut inner = self.lock();
            if let Some(data) = inner.fresh(&key, self.policy.ttl) {
                board_trace!("cache hit {}", key);
                return Ok(data);
            }
            match inner.in_flight.get_mut(&key) {
                Some(flight) => {
                    flight.waiters += 1;
                    (flight.id, flight.fetch.clone(), false)
                }
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let shared = fetch().boxed().shared();
                    inner.in_flight.insert(
                        key.clone(),
                        InFlight {
                            id,
                            fetch: shared.clone(),
                            waiters: 1,
                        },
                    );
                    inner.entries.insert(
                        key.clone(),
                        Entry {
                            state: QueryState::Loading,
                            stored_at: None,
                        },
                    );
                    (id, shared, true)
                }
            }
        };

        if started {
            self.notify(&key, QueryStatus::Loading);
        } else {
            board_debug!("joining in-flight query {}", key);
        }

        let waiter = Waiter {
            cache: self,
            key: &key,
            id,
        };
        let result = shared.await;
        self.settle(&key, id, &result);
        drop(waiter);
        result
    }

    fn settle(&self, key: &QueryKey, id: u64, result: &Result<T, ApiError>) {
        let status = {
            let mut inner = self.lock();
            // Another waiter may have settled this request already.
            if inner.in_flight.get(key).map(|flight| flight.id) != Some(id) {
                return;
            }
            inner.in_flight.remove(key);
            let (state, status, stored_at) = match result {
                Ok(data) => (
                    QueryState::Data(data.clone()),
                    QueryStatus::Success,
                    Some(Instant::now()),
                ),
                Err(err) => (
                    QueryState::Error(err.clone()),
                    QueryStatus::Failed(err.to_string()),
                    None,
                ),
            };
            inner
                .entries
                .insert(key.clone(), Entry { state, stored_at });
            status
        };
        self.notify(key, status);
    }
}

/// Tracks one caller of a pending request. The last waiter to leave before
/// the request settles removes it.
struct Waiter<'a, T> {
    cache: &'a QueryCache<T>,
    key: &'a QueryKey,
    id: u64,
}

impl<T> Drop for Waiter<'_, T> {
    fn drop(&mut self) {
        let mut inner = self.cache.lock();
        let abandoned = match inner.in_flight.get_mut(self.key) {
            Some(flight) if flight.id == self.id => {
                flight.waiters = flight.waiters.saturating_sub(1);
                flight.waiters == 0
            }
            _ => false,
        };
        if abandoned {
            inner.in_flight.remove(self.key);
            inner.entries.remove(self.key);
            drop(inner);
            board_debug!("query {} abandoned by all callers", self.key);
        }
    }
}
