//! Query/Mutation cache — the one invalidation contract every page follows.
//!
//! Each logical resource lives under a [`QueryKey`]. `query` returns the
//! cached snapshot immediately (possibly stale) and starts a background fetch
//! when the entry is absent, invalidated, or older than the configured stale
//! time, with at most one fetch in flight per key, ever. `mutate` runs
//! a write and marks the named keys stale before its result reaches the
//! caller, so any view rendered afterwards observes the new staleness and
//! re-fetches.
//!
//! Fetch execution goes through the injected [`Spawn`] seam: the browser
//! build hands futures to `leptos::task::spawn_local`, tests drain them
//! deterministically. The cache itself is only ever touched from the single
//! UI thread, so `Rc<RefCell<..>>` is the whole concurrency story.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use leptos::prelude::*;

use crate::error::{ApiError, ClientResult};

/// Default freshness window before a successful entry is re-fetched.
pub const DEFAULT_STALE_TIME_MS: f64 = 30_000.0;

fn now_millis() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

// =========================================================
// Keys and entry state
// =========================================================

/// Logical resource identifiers. Typed rather than stringly so pages cannot
/// invalidate a key that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    CurrentUser,
    Projects,
    ProjectTasks(String),
    OverviewStats,
    UserStats,
    ProjectStats(String),
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::CurrentUser => write!(f, "me"),
            QueryKey::Projects => write!(f, "projects"),
            QueryKey::ProjectTasks(id) => write!(f, "tasks:{}", id),
            QueryKey::OverviewStats => write!(f, "stats:overview"),
            QueryKey::UserStats => write!(f, "stats:user"),
            QueryKey::ProjectStats(id) => write!(f, "stats:project:{}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Typed view of one cache entry, handed to pages.
#[derive(Clone)]
pub struct ResourceState<T> {
    pub status: QueryStatus,
    /// Last successfully fetched value. Retained through later errors, so a
    /// failed refresh still has something stale-but-displayable to show.
    pub value: Option<Rc<T>>,
    pub error: Option<ApiError>,
    pub fetched_at: Option<f64>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            value: None,
            error: None,
            fetched_at: None,
        }
    }
}

impl<T> ResourceState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, QueryStatus::Idle | QueryStatus::Loading)
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

struct Entry {
    status: QueryStatus,
    value: Option<Rc<dyn Any>>,
    error: Option<ApiError>,
    fetched_at: Option<f64>,
    stale: bool,
    in_flight: bool,
    /// Bumped on every observable change; views track it to re-render.
    version: RwSignal<u64>,
}

impl Entry {
    fn new() -> Self {
        Self {
            status: QueryStatus::Idle,
            value: None,
            error: None,
            fetched_at: None,
            stale: false,
            in_flight: false,
            version: RwSignal::new(0),
        }
    }

    /// Whether a `query` call should start a fetch right now.
    fn needs_fetch(&self, stale_time_ms: f64, now: f64) -> bool {
        if self.in_flight {
            return false;
        }
        match self.status {
            QueryStatus::Idle | QueryStatus::Loading => true,
            // Settled entries, errors included, wait out the stale window
            // unless explicitly invalidated. Re-fetching an error on every
            // consumer would loop: the failure bumps the version, the
            // version wakes the consumer's effect, the effect queries again.
            QueryStatus::Success | QueryStatus::Error => {
                self.stale
                    || self
                        .fetched_at
                        .map(|at| now - at >= stale_time_ms)
                        .unwrap_or(true)
            }
        }
    }
}

// =========================================================
// Execution seam
// =========================================================

/// Where background fetches run.
pub trait Spawn {
    fn spawn(&self, fut: Pin<Box<dyn Future<Output = ()> + 'static>>);
}

/// Browser spawner: the Leptos task queue on the UI event loop.
pub struct LocalSpawner;

impl Spawn for LocalSpawner {
    fn spawn(&self, fut: Pin<Box<dyn Future<Output = ()> + 'static>>) {
        leptos::task::spawn_local(fut);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct QueryOptions {
    pub stale_time_ms: f64,
    /// One automatic retry for retryable failures. Mutations never retry.
    pub retry: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time_ms: DEFAULT_STALE_TIME_MS,
            retry: true,
        }
    }
}

pub type QueryFetcher<T> = Rc<dyn Fn() -> Pin<Box<dyn Future<Output = ClientResult<T>>>>>;

// =========================================================
// The cache
// =========================================================

#[derive(Clone)]
pub struct QueryCache {
    inner: Rc<CacheInner>,
}

struct CacheInner {
    entries: RefCell<HashMap<QueryKey, Entry>>,
    spawner: Box<dyn Spawn>,
}

impl QueryCache {
    pub fn new(spawner: Box<dyn Spawn>) -> Self {
        Self {
            inner: Rc::new(CacheInner {
                entries: RefCell::new(HashMap::new()),
                spawner,
            }),
        }
    }

    /// Mutates an entry (creating it if absent) and bumps its version after
    /// the map borrow is released.
    fn update_entry(&self, key: &QueryKey, f: impl FnOnce(&mut Entry)) {
        let version = {
            let mut entries = self.inner.entries.borrow_mut();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            f(entry);
            entry.version
        };
        version.update(|v| *v += 1);
    }

    /// Subscribes the current reactive scope to changes of `key`.
    pub fn track(&self, key: &QueryKey) {
        let version = {
            let mut entries = self.inner.entries.borrow_mut();
            entries
                .entry(key.clone())
                .or_insert_with(Entry::new)
                .version
        };
        version.get();
    }

    /// Current version counter, untracked. Useful for ordering assertions.
    pub fn version(&self, key: &QueryKey) -> u64 {
        let entries = self.inner.entries.borrow();
        entries
            .get(key)
            .map(|e| e.version.get_untracked())
            .unwrap_or(0)
    }

    /// Whether `key` is currently marked stale.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        let entries = self.inner.entries.borrow();
        entries.get(key).map(|e| e.stale).unwrap_or(false)
    }

    /// Typed snapshot of the entry, without side effects.
    pub fn snapshot<T: 'static>(&self, key: &QueryKey) -> ResourceState<T> {
        let entries = self.inner.entries.borrow();
        match entries.get(key) {
            None => ResourceState::default(),
            Some(entry) => ResourceState {
                status: entry.status,
                value: entry
                    .value
                    .clone()
                    .and_then(|v| v.downcast::<T>().ok()),
                error: entry.error.clone(),
                fetched_at: entry.fetched_at,
            },
        }
    }

    /// Returns the cached snapshot and, when the entry needs refreshing,
    /// starts exactly one background fetch for this key. Calls arriving while
    /// a fetch is in flight reuse it and issue no network traffic.
    pub fn query<T: 'static>(
        &self,
        key: QueryKey,
        fetcher: QueryFetcher<T>,
        options: QueryOptions,
    ) -> ResourceState<T> {
        let now = now_millis();
        // Only bump the version when a fetch actually starts; a no-op query
        // must not wake the effects that issued it.
        let started = {
            let mut entries = self.inner.entries.borrow_mut();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            if entry.needs_fetch(options.stale_time_ms, now) {
                entry.in_flight = true;
                // Keep showing the stale value during a background refresh;
                // only a first-ever fetch renders as Loading.
                if entry.value.is_none() {
                    entry.status = QueryStatus::Loading;
                }
                Some(entry.version)
            } else {
                None
            }
        };

        if let Some(version) = started {
            version.update(|v| *v += 1);
            let cache = self.clone();
            let fetch_key = key.clone();
            self.inner.spawner.spawn(Box::pin(async move {
                cache.run_fetch(fetch_key, fetcher, options.retry).await;
            }));
        }

        self.snapshot(&key)
    }

    async fn run_fetch<T: 'static>(&self, key: QueryKey, fetcher: QueryFetcher<T>, retry: bool) {
        let mut result = fetcher().await;
        if let Err(err) = &result {
            if retry && err.retryable() {
                result = fetcher().await;
            }
        }

        let now = now_millis();
        self.update_entry(&key, |entry| {
            entry.in_flight = false;
            match result {
                Ok(value) => {
                    entry.value = Some(Rc::new(value) as Rc<dyn Any>);
                    entry.status = QueryStatus::Success;
                    entry.error = None;
                    entry.fetched_at = Some(now);
                    entry.stale = false;
                }
                Err(err) => {
                    // Previous successful value stays displayable. The
                    // failure still stamps `fetched_at` so the entry is
                    // settled until invalidation or stale-time expiry.
                    entry.status = QueryStatus::Error;
                    entry.error = Some(err);
                    entry.fetched_at = Some(now);
                    entry.stale = false;
                }
            }
        });
    }

    /// Marks `key` stale: its next `query` re-fetches regardless of age.
    pub fn invalidate(&self, key: &QueryKey) {
        self.update_entry(key, |entry| {
            entry.stale = true;
        });
    }

    pub fn invalidate_many(&self, keys: &[QueryKey]) {
        for key in keys {
            self.invalidate(key);
        }
    }

    /// Runs a write operation. On success every key in `invalidates` is
    /// marked stale *before* the result is returned, so follow-up renders
    /// observe the staleness; on failure cached values are left untouched and
    /// the error is handed back for display. Never retries.
    pub async fn mutate<T>(
        &self,
        op: impl Future<Output = ClientResult<T>>,
        invalidates: &[QueryKey],
    ) -> ClientResult<T> {
        match op.await {
            Ok(value) => {
                self.invalidate_many(invalidates);
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }
}

/// The cache holds `Rc`s, so it cannot travel through context or view
/// closures itself. This handle can: it is `Copy + Send + Sync`, and
/// resolves to the cache on the UI thread when an event fires.
#[derive(Clone, Copy)]
pub struct QueryCacheHandle(StoredValue<QueryCache, LocalStorage>);

impl QueryCacheHandle {
    pub fn get(&self) -> QueryCache {
        self.0.get_value()
    }
}

pub fn provide_query_cache(cache: QueryCache) {
    provide_context(QueryCacheHandle(StoredValue::new_local(cache)));
}

pub fn use_query_cache() -> QueryCacheHandle {
    use_context::<QueryCacheHandle>().expect("QueryCache should be provided")
}

#[cfg(test)]
mod tests;
