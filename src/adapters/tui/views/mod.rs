pub mod create_task;
pub mod edit_task;
pub mod task_list;

pub use create_task::CreateTaskView;
pub use edit_task::EditTaskView;
pub use task_list::TaskListView;

use super::route::Route;
use crate::domain::{Task, TaskColor, TaskId};

/// What a screen knows about the data it asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Failed,
    Ready(T),
}

/// Requests a screen hands back to the shell, which owns navigation and
/// all network work.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    None,
    Navigate(Route),
    Toggle(Task),
    RequestDelete(Task),
    Create {
        title: String,
        color: TaskColor,
    },
    Save {
        id: TaskId,
        title: String,
        color: TaskColor,
    },
    Refresh,
    ShowHelp,
    Quit,
}
