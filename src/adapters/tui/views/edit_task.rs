use ratatui::{prelude::*, widgets::Paragraph};

use super::{QueryState, ViewAction};
use crate::adapters::tui::{
    event::AppEvent,
    route::Route,
    theme,
    widgets::{FormAction, TaskForm},
};
use crate::domain::{Task, TaskId};

pub const FETCH_ERROR: &str = "Error fetching task. Please try again.";

/// The `/edit/{id}` screen. The form only exists once the task has loaded.
pub struct EditTaskView {
    id: TaskId,
    form: QueryState<TaskForm>,
}

impl EditTaskView {
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            form: QueryState::Loading,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    #[cfg(test)]
    pub fn form(&self) -> Option<&TaskForm> {
        match &self.form {
            QueryState::Ready(form) => Some(form),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        matches!(self.form, QueryState::Loading)
    }

    #[cfg(test)]
    pub fn is_failed(&self) -> bool {
        matches!(self.form, QueryState::Failed)
    }

    /// Seeds the form from the first successful load. Later loads leave an
    /// existing form alone so in-progress edits survive.
    pub fn set_task(&mut self, task: &Task) {
        if matches!(self.form, QueryState::Ready(_)) {
            tracing::debug!("Ignoring reload of task {} while editing", task.id);
            return;
        }
        self.form = QueryState::Ready(TaskForm::for_edit(task));
    }

    pub fn set_failed(&mut self) {
        if !matches!(self.form, QueryState::Ready(_)) {
            self.form = QueryState::Failed;
        }
    }

    pub fn submission_failed(&mut self) {
        if let QueryState::Ready(form) = &mut self.form {
            form.submission_failed();
        }
    }

    pub fn handle_event(&mut self, event: &AppEvent) -> ViewAction {
        let QueryState::Ready(form) = &mut self.form else {
            return match event {
                AppEvent::Escape | AppEvent::Enter | AppEvent::Character('q') => {
                    ViewAction::Navigate(Route::List)
                }
                _ => ViewAction::None,
            };
        };

        match form.handle_event(event) {
            FormAction::None => ViewAction::None,
            FormAction::Back => ViewAction::Navigate(Route::List),
            FormAction::Submit { title, color } => ViewAction::Save {
                id: self.id,
                title,
                color,
            },
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match &self.form {
            QueryState::Loading => {
                let paragraph = Paragraph::new("Loading...")
                    .style(Style::default().fg(Color::Gray))
                    .alignment(Alignment::Center);
                frame.render_widget(paragraph, area);
            }
            QueryState::Failed => {
                let lines = vec![
                    Line::from(Span::styled(FETCH_ERROR, Style::default().fg(theme::ERROR))),
                    Line::from(Span::styled(
                        "Esc: back to tasks",
                        Style::default().fg(theme::MUTED),
                    )),
                ];
                frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
            }
            QueryState::Ready(form) => form.render(frame, area),
        }
    }
}
