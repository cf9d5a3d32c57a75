use serde::{Deserialize, Serialize};

use crate::domain::*;

// DTOs for API communication
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub completed: bool,
}

// Request DTOs
#[derive(Debug, Serialize)]
pub struct TaskCreateDto {
    pub title: String,
    pub color: TaskColor,
}

#[derive(Debug, Serialize)]
pub struct TaskUpdateDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<TaskColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

// Conversion implementations
impl From<TaskDto> for Task {
    fn from(dto: TaskDto) -> Self {
        let color = dto.color.parse::<TaskColor>().unwrap_or_else(|_| {
            tracing::warn!(
                "Task {} has unknown color '{}', using {}",
                dto.id,
                dto.color,
                TaskColor::default()
            );
            TaskColor::default()
        });

        Self {
            id: TaskId(dto.id),
            title: dto.title,
            color,
            completed: dto.completed,
        }
    }
}

impl From<&NewTask> for TaskCreateDto {
    fn from(task: &NewTask) -> Self {
        Self {
            title: task.title.clone(),
            color: task.color,
        }
    }
}

impl From<&TaskUpdate> for TaskUpdateDto {
    fn from(update: &TaskUpdate) -> Self {
        Self {
            title: update.title.clone(),
            color: update.color,
            completed: update.completed,
        }
    }
}
