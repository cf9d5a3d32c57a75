pub mod dialog;
pub mod task_form;
pub mod task_item;
pub mod text_input;

pub use dialog::{ConfirmDelete, Notification};
pub use task_form::{FormAction, TaskForm};
pub use task_item::TaskItem;
pub use text_input::TextInput;
