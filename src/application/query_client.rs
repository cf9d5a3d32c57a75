use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::AppResult;
use crate::domain::{Task, TaskId};
use crate::ports::{Cache, RepositoryResult};

/// Identity of a cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Tasks,
    Task(TaskId),
}

impl QueryKey {
    /// Keys a write to one task has to invalidate.
    pub fn for_task(id: TaskId) -> [QueryKey; 2] {
        [QueryKey::Tasks, QueryKey::Task(id)]
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Tasks => write!(f, "tasks"),
            QueryKey::Task(id) => write!(f, "task:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success { fetched_at: DateTime<Utc> },
    Error(String),
    Stale,
}

/// One typed query cache plus the status of every key it has seen.
pub struct Query<V> {
    cache: Arc<dyn Cache<QueryKey, V>>,
    statuses: DashMap<QueryKey, QueryStatus>,
    // Bumped on every invalidation; a fetch that started under an older
    // generation must not store its result.
    generations: DashMap<QueryKey, u64>,
}

impl<V> Query<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(cache: Arc<dyn Cache<QueryKey, V>>) -> Self {
        Self {
            cache,
            statuses: DashMap::new(),
            generations: DashMap::new(),
        }
    }

    fn generation(&self, key: &QueryKey) -> u64 {
        self.generations.get(key).map(|g| *g).unwrap_or(0)
    }

    /// Serves `key` from the cache, or runs `fetch` and caches the result.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetch: F) -> AppResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RepositoryResult<V>>,
    {
        if let Some(value) = self.cache.get(&key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(value);
        }

        let started_in = self.generation(&key);
        self.statuses.insert(key.clone(), QueryStatus::Loading);
        tracing::debug!("Fetching {}", key);

        match fetch().await {
            Ok(value) => {
                if self.generation(&key) == started_in {
                    self.cache.insert(key.clone(), value.clone()).await;
                    self.statuses.insert(
                        key,
                        QueryStatus::Success {
                            fetched_at: Utc::now(),
                        },
                    );
                } else {
                    tracing::debug!("Dropping result for {} fetched before invalidation", key);
                }
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("Query {} failed: {}", key, e);
                self.statuses.insert(key, QueryStatus::Error(e.to_string()));
                Err(e.into())
            }
        }
    }

    pub async fn invalidate(&self, key: &QueryKey) {
        *self.generations.entry(key.clone()).or_insert(0) += 1;
        self.cache.remove(key).await;
        if self.statuses.contains_key(key) {
            self.statuses.insert(key.clone(), QueryStatus::Stale);
        }
    }

    #[cfg(test)]
    pub async fn is_cached(&self, key: &QueryKey) -> bool {
        self.cache.get(key).await.is_some()
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        self.statuses
            .get(key)
            .map(|status| status.clone())
            .unwrap_or(QueryStatus::Idle)
    }
}

/// Session-wide remote-data cache. Reads go through the typed queries;
/// writes go through [`QueryClient::mutate`].
pub struct QueryClient {
    task_lists: Query<Vec<Task>>,
    tasks: Query<Task>,
}

impl QueryClient {
    pub fn new(
        task_list_cache: Arc<dyn Cache<QueryKey, Vec<Task>>>,
        task_cache: Arc<dyn Cache<QueryKey, Task>>,
    ) -> Self {
        Self {
            task_lists: Query::new(task_list_cache),
            tasks: Query::new(task_cache),
        }
    }

    pub fn task_lists(&self) -> &Query<Vec<Task>> {
        &self.task_lists
    }

    pub fn tasks(&self) -> &Query<Task> {
        &self.tasks
    }

    pub async fn invalidate(&self, keys: &[QueryKey]) {
        for key in keys {
            tracing::debug!("Invalidating {}", key);
            match key {
                QueryKey::Tasks => self.task_lists.invalidate(key).await,
                QueryKey::Task(_) => self.tasks.invalidate(key).await,
            }
        }
    }

    /// Runs a write. Invalidation of `invalidate` has completed by the time
    /// a success is returned; a failure leaves the cache untouched.
    pub async fn mutate<T, Fut>(&self, mutation: Fut, invalidate: &[QueryKey]) -> AppResult<T>
    where
        Fut: Future<Output = RepositoryResult<T>>,
    {
        match mutation.await {
            Ok(value) => {
                self.invalidate(invalidate).await;
                Ok(value)
            }
            Err(e) => {
                tracing::error!("Mutation failed: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        match key {
            QueryKey::Tasks => self.task_lists.status(key),
            QueryKey::Task(_) => self.tasks.status(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::MokaCacheAdapter;
    use crate::domain::TaskColor;
    use crate::ports::RepositoryError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;
    use tokio_test::{assert_err, assert_ok};

    fn client() -> QueryClient {
        QueryClient::new(
            Arc::new(MokaCacheAdapter::with_ttl(300)),
            Arc::new(MokaCacheAdapter::with_ttl(300)),
        )
    }

    fn task(id: i64, title: &str) -> Task {
        Task {
            id: TaskId(id),
            title: title.to_string(),
            color: TaskColor::Blue,
            completed: false,
        }
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let client = client();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![task(1, "a")])
        };

        let first = assert_ok!(client.task_lists().fetch(QueryKey::Tasks, fetch).await);
        let second = assert_ok!(client.task_lists().fetch(QueryKey::Tasks, fetch).await);

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            client.status(&QueryKey::Tasks),
            QueryStatus::Success { .. }
        ));
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let client = client();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![task(1, "a")])
        };

        assert_ok!(client.task_lists().fetch(QueryKey::Tasks, fetch).await);
        client.invalidate(&[QueryKey::Tasks]).await;
        assert_eq!(client.status(&QueryKey::Tasks), QueryStatus::Stale);

        assert_ok!(client.task_lists().fetch(QueryKey::Tasks, fetch).await);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_fetch_records_error_and_caches_nothing() {
        let client = client();
        let key = QueryKey::Task(TaskId(5));

        let result = client
            .tasks()
            .fetch(key.clone(), || async {
                Err(RepositoryError::NotFound("Resource not found".to_string()))
            })
            .await;

        let err = assert_err!(result);
        assert!(err.is_not_found());
        assert!(matches!(client.status(&key), QueryStatus::Error(_)));
        assert!(!client.tasks().is_cached(&key).await);
    }

    #[tokio::test]
    async fn successful_mutation_invalidates_before_returning() {
        let client = client();
        assert_ok!(
            client
                .task_lists()
                .fetch(QueryKey::Tasks, || async { Ok(vec![task(1, "a")]) })
                .await
        );
        assert_ok!(
            client
                .tasks()
                .fetch(QueryKey::Task(TaskId(1)), || async { Ok(task(1, "a")) })
                .await
        );

        let value = client
            .mutate(async { Ok::<_, RepositoryError>(7) }, &QueryKey::for_task(TaskId(1)))
            .await;

        assert_eq!(assert_ok!(value), 7);
        assert!(!client.task_lists().is_cached(&QueryKey::Tasks).await);
        assert!(!client.tasks().is_cached(&QueryKey::Task(TaskId(1))).await);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_cache_untouched() {
        let client = client();
        assert_ok!(
            client
                .task_lists()
                .fetch(QueryKey::Tasks, || async { Ok(vec![task(1, "a")]) })
                .await
        );

        let result = client
            .mutate(
                async {
                    Err::<(), _>(RepositoryError::Api {
                        status: 500,
                        message: "boom".to_string(),
                    })
                },
                &[QueryKey::Tasks],
            )
            .await;

        assert_err!(result);
        assert!(client.task_lists().is_cached(&QueryKey::Tasks).await);
        assert!(matches!(
            client.status(&QueryKey::Tasks),
            QueryStatus::Success { .. }
        ));
    }

    #[tokio::test]
    async fn fetch_started_before_invalidation_is_not_cached() {
        let client = Arc::new(client());
        let (release, gate) = oneshot::channel::<()>();
        let (started_tx, started) = oneshot::channel::<()>();

        let reader = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .task_lists()
                    .fetch(QueryKey::Tasks, || async move {
                        let _ = started_tx.send(());
                        let _ = gate.await;
                        Ok(vec![task(1, "before write")])
                    })
                    .await
            })
        };

        started.await.unwrap();
        client.invalidate(&[QueryKey::Tasks]).await;
        release.send(()).unwrap();

        let value = reader.await.unwrap().unwrap();
        assert_eq!(value[0].title, "before write");
        assert!(!client.task_lists().is_cached(&QueryKey::Tasks).await);
        assert_eq!(client.status(&QueryKey::Tasks), QueryStatus::Stale);
    }

    #[test]
    fn keys_display_as_query_identities() {
        assert_eq!(QueryKey::Tasks.to_string(), "tasks");
        assert_eq!(QueryKey::Task(TaskId(3)).to_string(), "task:3");
    }
}
