use super::*;
use crate::error::ApiError;
use std::cell::Cell;

// =========================================================
// Shared mock components
// =========================================================

/// Collects spawned fetch futures so tests run them deterministically.
struct SpawnQueue {
    tasks: RefCell<Vec<Pin<Box<dyn Future<Output = ()>>>>>,
}

impl SpawnQueue {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            tasks: RefCell::new(Vec::new()),
        })
    }

    fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Runs every queued fetch to completion, including ones queued while
    /// draining.
    async fn drain(&self) {
        loop {
            let next = {
                let mut tasks = self.tasks.borrow_mut();
                if tasks.is_empty() {
                    None
                } else {
                    Some(tasks.remove(0))
                }
            };
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }
}

struct QueueSpawner(Rc<SpawnQueue>);

impl Spawn for QueueSpawner {
    fn spawn(&self, fut: Pin<Box<dyn Future<Output = ()> + 'static>>) {
        self.0.tasks.borrow_mut().push(fut);
    }
}

/// Scripted fetcher: counts calls and pops one canned result per call.
struct FetchScript<T> {
    calls: Cell<usize>,
    results: RefCell<Vec<ClientResult<T>>>,
}

impl<T> FetchScript<T> {
    fn new(results: Vec<ClientResult<T>>) -> Rc<Self> {
        Rc::new(Self {
            calls: Cell::new(0),
            results: RefCell::new(results),
        })
    }

    fn calls(&self) -> usize {
        self.calls.get()
    }
}

fn fetcher_of<T: 'static>(script: Rc<FetchScript<T>>) -> QueryFetcher<T> {
    Rc::new(move || {
        let script = script.clone();
        Box::pin(async move {
            script.calls.set(script.calls.get() + 1);
            script.results.borrow_mut().remove(0)
        })
    })
}

fn setup() -> (QueryCache, Rc<SpawnQueue>) {
    let queue = SpawnQueue::new();
    let cache = QueryCache::new(Box::new(QueueSpawner(queue.clone())));
    (cache, queue)
}

fn projects_key() -> QueryKey {
    QueryKey::Projects
}

// =========================================================
// Tests
// =========================================================

#[tokio::test]
async fn concurrent_queries_share_one_in_flight_fetch() {
    let (cache, queue) = setup();
    let script = FetchScript::new(vec![Ok(vec!["alpha".to_string()])]);
    let fetcher = fetcher_of(script.clone());

    let first = cache.query(projects_key(), fetcher.clone(), QueryOptions::default());
    assert_eq!(first.status, QueryStatus::Loading);

    // Same key queried again while the fetch is in flight: no second task.
    let second = cache.query(projects_key(), fetcher.clone(), QueryOptions::default());
    assert_eq!(second.status, QueryStatus::Loading);
    assert_eq!(queue.pending(), 1);

    queue.drain().await;
    assert_eq!(script.calls(), 1);

    let settled: ResourceState<Vec<String>> = cache.snapshot(&projects_key());
    assert_eq!(settled.status, QueryStatus::Success);
    assert_eq!(settled.value.unwrap().as_slice(), ["alpha".to_string()]);
}

#[tokio::test]
async fn fresh_value_is_reused_within_stale_time() {
    let (cache, queue) = setup();
    let script = FetchScript::new(vec![Ok(1u32)]);
    let fetcher = fetcher_of(script.clone());

    cache.query(projects_key(), fetcher.clone(), QueryOptions::default());
    queue.drain().await;

    let again = cache.query(projects_key(), fetcher.clone(), QueryOptions::default());
    assert_eq!(again.status, QueryStatus::Success);
    assert_eq!(queue.pending(), 0);
    assert_eq!(script.calls(), 1);
}

#[tokio::test]
async fn invalidation_forces_a_fresh_fetch_regardless_of_stale_time() {
    let (cache, queue) = setup();
    let script = FetchScript::new(vec![Ok(1u32), Ok(2u32)]);
    let fetcher = fetcher_of(script.clone());
    let options = QueryOptions {
        stale_time_ms: f64::MAX,
        retry: false,
    };

    cache.query(projects_key(), fetcher.clone(), options);
    queue.drain().await;
    assert_eq!(script.calls(), 1);

    cache.invalidate(&projects_key());
    assert!(cache.is_stale(&projects_key()));

    let refreshed = cache.query(projects_key(), fetcher.clone(), options);
    // The stale value is still shown while the refresh runs.
    assert_eq!(refreshed.status, QueryStatus::Success);
    assert_eq!(*refreshed.value.unwrap(), 1);

    queue.drain().await;
    assert_eq!(script.calls(), 2);
    let settled: ResourceState<u32> = cache.snapshot(&projects_key());
    assert_eq!(*settled.value.unwrap(), 2);
    assert!(!cache.is_stale(&projects_key()));
}

#[tokio::test]
async fn failed_refresh_keeps_the_previous_value() {
    let (cache, queue) = setup();
    let script = FetchScript::new(vec![
        Ok(7u32),
        Err(ApiError::from_response(400, "rejected")),
    ]);
    let fetcher = fetcher_of(script.clone());
    let options = QueryOptions {
        stale_time_ms: f64::MAX,
        retry: false,
    };

    cache.query(projects_key(), fetcher.clone(), options);
    queue.drain().await;

    cache.invalidate(&projects_key());
    cache.query(projects_key(), fetcher.clone(), options);
    queue.drain().await;

    let state: ResourceState<u32> = cache.snapshot(&projects_key());
    assert_eq!(state.status, QueryStatus::Error);
    assert_eq!(*state.value.unwrap(), 7, "stale value must stay displayable");
    assert_eq!(state.error.unwrap().user_message(), "rejected");
}

#[tokio::test]
async fn failed_queries_do_not_refetch_until_invalidated() {
    let (cache, queue) = setup();
    let script = FetchScript::new(vec![Err(ApiError::from_response(404, "gone")), Ok(5u32)]);
    let fetcher = fetcher_of(script.clone());
    let options = QueryOptions {
        stale_time_ms: f64::MAX,
        retry: false,
    };

    cache.query(projects_key(), fetcher.clone(), options);
    queue.drain().await;
    assert_eq!(script.calls(), 1);

    // Every later consumer sees the settled error; none restarts the fetch.
    let again = cache.query(projects_key(), fetcher.clone(), options);
    assert_eq!(again.status, QueryStatus::Error);
    assert_eq!(queue.pending(), 0);
    assert_eq!(script.calls(), 1);

    // Invalidation is the way out of the error state.
    cache.invalidate(&projects_key());
    cache.query(projects_key(), fetcher.clone(), options);
    queue.drain().await;
    assert_eq!(script.calls(), 2);
    let state: ResourceState<u32> = cache.snapshot(&projects_key());
    assert_eq!(state.status, QueryStatus::Success);
}

#[tokio::test]
async fn retryable_failures_get_exactly_one_retry() {
    let (cache, queue) = setup();
    let script = FetchScript::new(vec![
        Err(ApiError::from_response(500, "hiccup")),
        Ok(3u32),
    ]);
    cache.query(
        projects_key(),
        fetcher_of(script.clone()),
        QueryOptions::default(),
    );
    queue.drain().await;

    assert_eq!(script.calls(), 2);
    let state: ResourceState<u32> = cache.snapshot(&projects_key());
    assert_eq!(state.status, QueryStatus::Success);
}

#[tokio::test]
async fn validation_failures_are_never_retried() {
    let (cache, queue) = setup();
    let script = FetchScript::<u32>::new(vec![Err(ApiError::from_response(422, "bad input"))]);
    cache.query(
        projects_key(),
        fetcher_of(script.clone()),
        QueryOptions::default(),
    );
    queue.drain().await;

    assert_eq!(script.calls(), 1);
    let state: ResourceState<u32> = cache.snapshot(&projects_key());
    assert_eq!(state.status, QueryStatus::Error);
}

#[tokio::test]
async fn mutation_invalidates_before_its_result_resolves() {
    let (cache, queue) = setup();
    let script = FetchScript::new(vec![Ok(10u32)]);
    cache.query(
        projects_key(),
        fetcher_of(script.clone()),
        QueryOptions::default(),
    );
    queue.drain().await;
    assert!(!cache.is_stale(&projects_key()));

    let created = cache
        .mutate(async { Ok::<_, ApiError>("new-project") }, &[projects_key()])
        .await
        .unwrap();
    assert_eq!(created, "new-project");

    // By the time the mutation's result is observable, the key is stale.
    assert!(cache.is_stale(&projects_key()));
}

#[tokio::test]
async fn failed_mutation_leaves_the_cache_untouched() {
    let (cache, queue) = setup();
    let script = FetchScript::new(vec![Ok(vec!["t1".to_string()])]);
    let key = QueryKey::ProjectTasks("p1".into());
    cache.query(key.clone(), fetcher_of(script.clone()), QueryOptions::default());
    queue.drain().await;
    let version_before = cache.version(&key);

    let err = cache
        .mutate(
            async { Err::<(), _>(ApiError::from_response(404, "Task not found")) },
            &[key.clone()],
        )
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Task not found");
    assert!(!cache.is_stale(&key), "no invalidation on failure");
    assert_eq!(cache.version(&key), version_before);
    let state: ResourceState<Vec<String>> = cache.snapshot(&key);
    assert_eq!(state.value.unwrap().as_slice(), ["t1".to_string()]);
}

#[tokio::test]
async fn create_then_refetch_shows_the_new_item() {
    // End-to-end shape of the "create project" flow: list, mutate with
    // invalidation, list again without any manual refresh logic.
    let (cache, queue) = setup();
    let script = FetchScript::new(vec![
        Ok(vec!["old".to_string()]),
        Ok(vec!["old".to_string(), "new".to_string()]),
    ]);
    let fetcher = fetcher_of(script.clone());
    let options = QueryOptions {
        stale_time_ms: f64::MAX,
        retry: false,
    };

    cache.query(projects_key(), fetcher.clone(), options);
    queue.drain().await;

    cache
        .mutate(async { Ok::<_, ApiError>(()) }, &[projects_key()])
        .await
        .unwrap();

    cache.query(projects_key(), fetcher.clone(), options);
    queue.drain().await;

    let state: ResourceState<Vec<String>> = cache.snapshot(&projects_key());
    assert_eq!(
        state.value.unwrap().as_slice(),
        ["old".to_string(), "new".to_string()]
    );
    assert_eq!(script.calls(), 2);
}

#[tokio::test]
async fn independent_keys_fetch_independently() {
    let (cache, queue) = setup();
    let projects = FetchScript::new(vec![Ok(1u32)]);
    let tasks = FetchScript::new(vec![Ok(2u32)]);

    cache.query(
        QueryKey::Projects,
        fetcher_of(projects.clone()),
        QueryOptions::default(),
    );
    cache.query(
        QueryKey::ProjectTasks("p1".into()),
        fetcher_of(tasks.clone()),
        QueryOptions::default(),
    );
    assert_eq!(queue.pending(), 2);

    queue.drain().await;
    assert_eq!(projects.calls(), 1);
    assert_eq!(tasks.calls(), 1);
}

#[test]
fn query_keys_have_stable_display_forms() {
    assert_eq!(QueryKey::Projects.to_string(), "projects");
    assert_eq!(QueryKey::CurrentUser.to_string(), "me");
    assert_eq!(QueryKey::ProjectTasks("p1".into()).to_string(), "tasks:p1");
    assert_eq!(QueryKey::OverviewStats.to_string(), "stats:overview");
    assert_eq!(QueryKey::UserStats.to_string(), "stats:user");
    assert_eq!(
        QueryKey::ProjectStats("p1".into()).to_string(),
        "stats:project:p1"
    );
}
