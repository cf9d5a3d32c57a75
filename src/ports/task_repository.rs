use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewTask, Task, TaskId, TaskUpdate};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Remote task collection. Implementations only perform I/O; they never
/// touch client-side state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>>;

    /// A missing task is `RepositoryError::NotFound`, never an empty value.
    async fn get_task(&self, id: TaskId) -> RepositoryResult<Task>;

    async fn create_task(&self, task: &NewTask) -> RepositoryResult<Task>;

    /// Servers may answer with the updated task or with an empty body.
    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> RepositoryResult<Option<Task>>;

    async fn delete_task(&self, id: TaskId) -> RepositoryResult<()>;
}
