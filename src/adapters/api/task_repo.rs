use async_trait::async_trait;

use super::{TaskCreateDto, TaskDto, TaskUpdateDto, TodoClient};
use crate::{
    domain::{NewTask, Task, TaskId, TaskUpdate},
    ports::{RepositoryResult, TaskRepository},
};

/// `TaskRepository` backed by the REST API.
pub struct HttpTaskRepository {
    client: TodoClient,
}

impl HttpTaskRepository {
    pub fn new(client: TodoClient) -> Self {
        Self { client }
    }

    fn task_path(id: TaskId) -> String {
        format!("/tasks/{id}")
    }
}

#[async_trait]
impl TaskRepository for HttpTaskRepository {
    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>> {
        let task_dtos: Vec<TaskDto> = self.client.get("/tasks").await?;
        Ok(task_dtos.into_iter().map(|dto| dto.into()).collect())
    }

    async fn get_task(&self, id: TaskId) -> RepositoryResult<Task> {
        let task_dto: TaskDto = self.client.get(&Self::task_path(id)).await?;
        Ok(task_dto.into())
    }

    async fn create_task(&self, task: &NewTask) -> RepositoryResult<Task> {
        let create_dto = TaskCreateDto::from(task);
        let task_dto: TaskDto = self.client.post("/tasks", &create_dto).await?;
        Ok(task_dto.into())
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> RepositoryResult<Option<Task>> {
        let update_dto = TaskUpdateDto::from(update);
        let task_dto: Option<TaskDto> = self.client.put(&Self::task_path(id), &update_dto).await?;
        Ok(task_dto.map(Task::from))
    }

    async fn delete_task(&self, id: TaskId) -> RepositoryResult<()> {
        self.client.delete(&Self::task_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_paths_use_numeric_ids() {
        assert_eq!(HttpTaskRepository::task_path(TaskId(17)), "/tasks/17");
    }
}
