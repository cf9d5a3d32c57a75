use ratatui::prelude::*;

use super::ViewAction;
use crate::adapters::tui::{
    event::AppEvent,
    route::Route,
    widgets::{FormAction, TaskForm},
};

/// The `/create` screen.
pub struct CreateTaskView {
    form: TaskForm,
}

impl CreateTaskView {
    pub fn new() -> Self {
        Self {
            form: TaskForm::for_create(),
        }
    }

    #[cfg(test)]
    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn submission_failed(&mut self) {
        self.form.submission_failed();
    }

    pub fn handle_event(&mut self, event: &AppEvent) -> ViewAction {
        match self.form.handle_event(event) {
            FormAction::None => ViewAction::None,
            FormAction::Back => ViewAction::Navigate(Route::List),
            FormAction::Submit { title, color } => ViewAction::Create { title, color },
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        self.form.render(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskColor;
    use crate::test_support::{buffer_text, render};

    #[test]
    fn submit_requests_create_with_trimmed_title() {
        let mut view = CreateTaskView::new();
        for c in " Buy milk ".chars() {
            view.handle_event(&AppEvent::Character(c));
        }

        assert_eq!(
            view.handle_event(&AppEvent::Enter),
            ViewAction::Create {
                title: "Buy milk".to_string(),
                color: TaskColor::Red,
            }
        );
    }

    #[test]
    fn blank_submit_shows_inline_error() {
        let mut view = CreateTaskView::new();
        assert_eq!(view.handle_event(&AppEvent::Enter), ViewAction::None);

        let text = buffer_text(&render(60, 16, |frame| {
            let area = frame.area();
            view.render(frame, area)
        }));
        assert!(text.contains("Title is required"));
        assert!(text.contains("Add Task"));
    }

    #[test]
    fn escape_goes_back_to_list() {
        let mut view = CreateTaskView::new();
        assert_eq!(
            view.handle_event(&AppEvent::Escape),
            ViewAction::Navigate(Route::List)
        );
    }
}
