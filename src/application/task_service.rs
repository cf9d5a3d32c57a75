use std::sync::Arc;

use super::{AppResult, QueryClient, QueryKey};
use crate::domain::*;
use crate::ports::TaskRepository;

/// Task operations as the screens and subcommands see them: reads go
/// through the query cache, writes are mutations that invalidate it.
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
    queries: Arc<QueryClient>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>, queries: Arc<QueryClient>) -> Self {
        Self {
            repository,
            queries,
        }
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        self.queries
            .task_lists()
            .fetch(QueryKey::Tasks, || self.repository.list_tasks())
            .await
    }

    /// Drops the cached list before reading it again.
    pub async fn refresh_tasks(&self) -> AppResult<Vec<Task>> {
        self.queries.invalidate(&[QueryKey::Tasks]).await;
        self.list_tasks().await
    }

    pub async fn get_task(&self, id: TaskId) -> AppResult<Task> {
        self.queries
            .tasks()
            .fetch(QueryKey::Task(id), || self.repository.get_task(id))
            .await
    }

    pub async fn create_task(&self, title: &str, color: TaskColor) -> AppResult<Task> {
        let new_task = NewTask::new(title, color)?;

        let task = self
            .queries
            .mutate(self.repository.create_task(&new_task), &[QueryKey::Tasks])
            .await?;

        tracing::info!("Created task {} ({})", task.id, task.title);
        Ok(task)
    }

    pub async fn update_task(
        &self,
        id: TaskId,
        title: &str,
        color: TaskColor,
    ) -> AppResult<Option<Task>> {
        let update = TaskUpdate::details(title, color)?;

        let updated = self
            .queries
            .mutate(self.repository.update_task(id, &update), &QueryKey::for_task(id))
            .await?;

        tracing::info!("Updated task {}", id);
        Ok(updated)
    }

    pub async fn set_completed(&self, id: TaskId, completed: bool) -> AppResult<Option<Task>> {
        let update = TaskUpdate::completion(completed);

        let updated = self
            .queries
            .mutate(self.repository.update_task(id, &update), &QueryKey::for_task(id))
            .await?;

        tracing::info!("Marked task {} completed={}", id, completed);
        Ok(updated)
    }

    /// Sends the inverse of the flag the caller is looking at.
    pub async fn toggle_completion(&self, task: &Task) -> AppResult<Option<Task>> {
        self.set_completed(task.id, !task.completed).await
    }

    pub async fn delete_task(&self, id: TaskId) -> AppResult<()> {
        self.queries
            .mutate(self.repository.delete_task(id), &QueryKey::for_task(id))
            .await?;

        tracing::info!("Deleted task {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::MokaCacheAdapter;
    use crate::ports::{MockTaskRepository, RepositoryError};
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    fn service(repository: MockTaskRepository) -> TaskService {
        let queries = QueryClient::new(
            Arc::new(MokaCacheAdapter::with_ttl(300)),
            Arc::new(MokaCacheAdapter::with_ttl(300)),
        );
        TaskService::new(Arc::new(repository), Arc::new(queries))
    }

    fn task(id: i64, completed: bool) -> Task {
        Task {
            id: TaskId(id),
            title: format!("Task {id}"),
            color: TaskColor::Purple,
            completed,
        }
    }

    #[tokio::test]
    async fn blank_title_never_reaches_the_server() {
        let mut repository = MockTaskRepository::new();
        repository.expect_create_task().never();
        repository.expect_update_task().never();
        let service = service(repository);

        let err = assert_err!(service.create_task("   ", TaskColor::Red).await);
        assert!(err.is_validation());

        let err = assert_err!(service.update_task(TaskId(1), "", TaskColor::Red).await);
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn create_sends_trimmed_title() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_create_task()
            .withf(|new_task: &NewTask| new_task.title == "Walk dog" && new_task.color == TaskColor::Green)
            .times(1)
            .returning(|new_task| {
                Ok(Task {
                    id: TaskId(10),
                    title: new_task.title.clone(),
                    color: new_task.color,
                    completed: false,
                })
            });
        let service = service(repository);

        let created = assert_ok!(service.create_task("  Walk dog ", TaskColor::Green).await);
        assert_eq!(created.id, TaskId(10));
        assert!(!created.completed);
    }

    #[tokio::test]
    async fn list_is_cached_until_a_mutation_succeeds() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_list_tasks()
            .times(2)
            .returning(|| Ok(vec![task(1, false)]));
        repository
            .expect_create_task()
            .times(1)
            .returning(|_| Ok(task(2, false)));
        let service = service(repository);

        assert_ok!(service.list_tasks().await);
        assert_ok!(service.list_tasks().await);
        assert_ok!(service.create_task("New", TaskColor::Red).await);
        assert_ok!(service.list_tasks().await);
    }

    #[tokio::test]
    async fn toggle_sends_the_inverse_flag() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_update_task()
            .with(eq(TaskId(1)), eq(TaskUpdate::completion(true)))
            .times(1)
            .returning(|_, _| Ok(None));
        repository
            .expect_update_task()
            .with(eq(TaskId(2)), eq(TaskUpdate::completion(false)))
            .times(1)
            .returning(|_, _| Ok(Some(task(2, false))));
        let service = service(repository);

        assert_eq!(assert_ok!(service.toggle_completion(&task(1, false)).await), None);
        let updated = assert_ok!(service.toggle_completion(&task(2, true)).await);
        assert_eq!(updated.map(|t| t.completed), Some(false));
    }

    #[tokio::test]
    async fn edit_invalidates_list_and_task() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_get_task()
            .with(eq(TaskId(4)))
            .times(2)
            .returning(|id| Ok(task(id.0, false)));
        repository
            .expect_update_task()
            .withf(|id, update| {
                *id == TaskId(4)
                    && update.title.as_deref() == Some("Renamed")
                    && update.color == Some(TaskColor::Beige)
                    && update.completed.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(None));
        let service = service(repository);

        assert_ok!(service.get_task(TaskId(4)).await);
        assert_ok!(service.get_task(TaskId(4)).await);
        assert_ok!(service.update_task(TaskId(4), " Renamed ", TaskColor::Beige).await);
        assert_ok!(service.get_task(TaskId(4)).await);
    }

    #[tokio::test]
    async fn not_found_surfaces_as_error() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_get_task()
            .returning(|_| Err(RepositoryError::NotFound("Resource not found".to_string())));
        let service = service(repository);

        let err = assert_err!(service.get_task(TaskId(99)).await);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn failed_delete_keeps_cached_list() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_list_tasks()
            .times(1)
            .returning(|| Ok(vec![task(1, false)]));
        repository.expect_delete_task().times(1).returning(|_| {
            Err(RepositoryError::Api {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        });
        let service = service(repository);

        assert_ok!(service.list_tasks().await);
        assert_err!(service.delete_task(TaskId(1)).await);
        let tasks = assert_ok!(service.list_tasks().await);
        assert_eq!(tasks.len(), 1);
    }

    #[tokio::test]
    async fn refresh_bypasses_cached_list() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_list_tasks()
            .times(2)
            .returning(|| Ok(vec![task(1, true)]));
        let service = service(repository);

        assert_ok!(service.list_tasks().await);
        let tasks = assert_ok!(service.refresh_tasks().await);
        assert!(tasks[0].completed);
    }
}
