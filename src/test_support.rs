//! In-memory repository and render helpers shared by the screen tests.

use async_trait::async_trait;
use dashmap::DashMap;
use ratatui::{backend::TestBackend, buffer::Buffer, Frame, Terminal};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::adapters::cache::MokaCacheAdapter;
use crate::application::{QueryClient, TaskService};
use crate::domain::{NewTask, Task, TaskColor, TaskId, TaskUpdate};
use crate::ports::{RepositoryError, RepositoryResult, TaskRepository};

pub struct InMemoryTaskRepository {
    tasks: DashMap<i64, Task>,
    next_id: AtomicI64,
    failing: AtomicBool,
    requests: AtomicUsize,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
            next_id: AtomicI64::new(1),
            failing: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let repository = Self::new();
        let mut max_id = 0;
        for task in tasks {
            max_id = max_id.max(task.id.0);
            repository.tasks.insert(task.id.0, task);
        }
        repository.next_id.store(max_id + 1, Ordering::SeqCst);
        repository
    }

    /// Every request answers HTTP 500 while set.
    pub fn fail_requests(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.iter().map(|t| t.value().clone()).collect();
        tasks.sort_by_key(|t| t.id.0);
        tasks
    }

    fn begin(&self) -> RepositoryResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Api {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(id: TaskId) -> RepositoryError {
        RepositoryError::NotFound(format!("Task {id} not found"))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>> {
        self.begin()?;
        Ok(self.snapshot())
    }

    async fn get_task(&self, id: TaskId) -> RepositoryResult<Task> {
        self.begin()?;
        self.tasks
            .get(&id.0)
            .map(|t| t.value().clone())
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create_task(&self, task: &NewTask) -> RepositoryResult<Task> {
        self.begin()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Task {
            id: TaskId(id),
            title: task.title.clone(),
            color: task.color,
            completed: false,
        };
        self.tasks.insert(id, created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> RepositoryResult<Option<Task>> {
        self.begin()?;
        let mut task = self.tasks.get_mut(&id.0).ok_or_else(|| Self::not_found(id))?;
        if let Some(title) = &update.title {
            task.title = title.clone();
        }
        if let Some(color) = update.color {
            task.color = color;
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: TaskId) -> RepositoryResult<()> {
        self.begin()?;
        self.tasks
            .remove(&id.0)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }
}

pub fn task(id: i64, title: &str, color: TaskColor, completed: bool) -> Task {
    Task {
        id: TaskId(id),
        title: title.to_string(),
        color,
        completed,
    }
}

pub fn service(repository: Arc<InMemoryTaskRepository>) -> Arc<TaskService> {
    let queries = QueryClient::new(
        Arc::new(MokaCacheAdapter::with_ttl(300)),
        Arc::new(MokaCacheAdapter::with_ttl(300)),
    );
    Arc::new(TaskService::new(repository, Arc::new(queries)))
}

pub fn render<F>(width: u16, height: u16, draw: F) -> Buffer
where
    F: FnOnce(&mut Frame),
{
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
    terminal.draw(draw).expect("draw");
    terminal.backend().buffer().clone()
}

pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

pub fn buffer_text(buffer: &Buffer) -> String {
    buffer_lines(buffer).join("\n")
}

/// Column and row of the first cell of `text`.
pub fn find_text(buffer: &Buffer, text: &str) -> Option<(u16, u16)> {
    buffer_lines(buffer)
        .iter()
        .enumerate()
        .find_map(|(y, line)| {
            line.find(text)
                .map(|index| (line[..index].chars().count() as u16, y as u16))
        })
}
