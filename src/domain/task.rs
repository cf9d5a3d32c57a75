use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DomainError, DomainResult, TaskColor};

/// Server-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        TaskId(id)
    }
}

impl FromStr for TaskId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(TaskId)
            .map_err(|_| DomainError::InvalidId(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub color: TaskColor,
    pub completed: bool,
}

/// Trims a title and rejects it when nothing is left.
pub fn validate_title(title: &str) -> DomainResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// A task the server has not seen yet. There is no id until the server
/// answers the create request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub color: TaskColor,
}

impl NewTask {
    pub fn new(title: &str, color: TaskColor) -> DomainResult<Self> {
        Ok(Self {
            title: validate_title(title)?,
            color,
        })
    }
}

/// Partial update; only populated fields go over the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub color: Option<TaskColor>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    /// Title and color edit, as submitted from the edit form.
    pub fn details(title: &str, color: TaskColor) -> DomainResult<Self> {
        Ok(Self {
            title: Some(validate_title(title)?),
            color: Some(color),
            completed: None,
        })
    }

    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.color.is_none() && self.completed.is_none()
    }
}
