//! Bridge between the cache and Leptos views.
//!
//! `use_query` wires a cache key into the reactive graph: the returned signal
//! re-evaluates whenever the entry changes, and an effect re-issues the query
//! when a mutation marks it stale — the cache's in-flight guard keeps this
//! from ever duplicating network calls. Unmounted views simply stop tracking
//! the entry's version signal, so late responses update the cache without
//! touching dead views.

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::cache::{
    QueryCache, QueryFetcher, QueryKey, QueryOptions, ResourceState, use_query_cache,
};
use crate::error::ClientResult;

/// Declares that the current view needs `key`, fetched with `fetch`.
/// The state holds `Rc`s, so the returned signal is a thread-local one.
pub fn use_query<T, F, Fut>(
    key: QueryKey,
    fetch: F,
    options: QueryOptions,
) -> Signal<ResourceState<T>, LocalStorage>
where
    T: 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = ClientResult<T>> + 'static,
{
    let cache = use_query_cache().get();
    let fetcher: QueryFetcher<T> = Rc::new(move || Box::pin(fetch()));

    // Initial fetch plus automatic re-fetch after invalidation.
    Effect::new({
        let cache = cache.clone();
        let key = key.clone();
        let fetcher = fetcher.clone();
        move |_| {
            cache.track(&key);
            cache.query(key.clone(), fetcher.clone(), options);
        }
    });

    Signal::derive_local(move || {
        cache.track(&key);
        cache.snapshot(&key)
    })
}

/// Fires a mutation from an event handler: runs `op`, applies the
/// invalidation set on success, then hands the outcome to `on_done` (toast,
/// dialog close, ...). Errors never propagate past this point.
pub fn run_mutation<T: 'static>(
    cache: &QueryCache,
    op: impl Future<Output = ClientResult<T>> + 'static,
    invalidates: Vec<QueryKey>,
    on_done: impl FnOnce(ClientResult<T>) + 'static,
) {
    let cache = cache.clone();
    spawn_local(async move {
        let result = cache.mutate(op, &invalidates).await;
        on_done(result);
    });
}
