use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::TextInput;
use crate::adapters::tui::{event::AppEvent, theme};
use crate::domain::{validate_title, Task, TaskColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Back,
    Title,
    Color,
    Submit,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        FormField::Back,
        FormField::Title,
        FormField::Color,
        FormField::Submit,
    ];

    fn next(self) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(index + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(index + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    None,
    Back,
    /// Title is already trimmed and known to be non-blank.
    Submit { title: String, color: TaskColor },
}

/// Title input, color swatches and a submit button, shared by the create
/// and edit screens.
pub struct TaskForm {
    title: TextInput,
    color: TaskColor,
    editing: bool,
    focus: FormField,
    error: Option<String>,
    submitting: bool,
}

impl TaskForm {
    pub fn new(initial_title: &str, initial_color: TaskColor, editing: bool) -> Self {
        let mut form = Self {
            title: TextInput::new("Title", "Ex. Brush your teeth").with_value(initial_title),
            color: initial_color,
            editing,
            focus: FormField::Title,
            error: None,
            submitting: false,
        };
        form.sync_focus();
        form
    }

    pub fn for_create() -> Self {
        Self::new("", TaskColor::default(), false)
    }

    pub fn for_edit(task: &Task) -> Self {
        Self::new(&task.title, task.color, true)
    }

    #[cfg(test)]
    pub fn title(&self) -> &str {
        self.title.value()
    }

    #[cfg(test)]
    pub fn color(&self) -> TaskColor {
        self.color
    }

    #[cfg(test)]
    pub fn focus(&self) -> FormField {
        self.focus
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Re-enables the form after the server rejected a submission.
    pub fn submission_failed(&mut self) {
        self.submitting = false;
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.submitting, self.editing) {
            (true, _) => "Saving...",
            (false, true) => "Save ✓",
            (false, false) => "Add Task ⊕",
        }
    }

    fn sync_focus(&mut self) {
        self.title.set_focused(self.focus == FormField::Title);
    }

    fn set_focus(&mut self, focus: FormField) {
        self.focus = focus;
        self.sync_focus();
    }

    pub fn submit(&mut self) -> FormAction {
        if self.submitting {
            return FormAction::None;
        }

        match validate_title(self.title.value()) {
            Ok(title) => {
                self.error = None;
                self.submitting = true;
                FormAction::Submit {
                    title,
                    color: self.color,
                }
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.set_focus(FormField::Title);
                FormAction::None
            }
        }
    }

    pub fn handle_event(&mut self, event: &AppEvent) -> FormAction {
        match event {
            AppEvent::Escape => return FormAction::Back,
            AppEvent::Tab | AppEvent::Down => self.set_focus(self.focus.next()),
            AppEvent::BackTab | AppEvent::Up => self.set_focus(self.focus.previous()),
            AppEvent::Enter => {
                return match self.focus {
                    FormField::Back => FormAction::Back,
                    _ => self.submit(),
                };
            }
            _ => match self.focus {
                FormField::Title => self.handle_title_event(event),
                FormField::Color => self.handle_color_event(event),
                FormField::Back | FormField::Submit => {}
            },
        }
        FormAction::None
    }

    fn handle_title_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Character(c) => {
                self.title.insert_char(*c);
                self.error = None;
            }
            AppEvent::Backspace => self.title.delete_char(),
            AppEvent::Delete => self.title.delete_forward(),
            AppEvent::Left => self.title.move_left(),
            AppEvent::Right => self.title.move_right(),
            AppEvent::Home => self.title.move_home(),
            AppEvent::End => self.title.move_end(),
            _ => {}
        }
    }

    fn handle_color_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Left | AppEvent::Character('h') => self.color = self.color.previous(),
            AppEvent::Right | AppEvent::Character('l') | AppEvent::Character(' ') => {
                self.color = self.color.next()
            }
            AppEvent::Home => self.color = TaskColor::ALL[0],
            AppEvent::End => self.color = TaskColor::ALL[TaskColor::ALL.len() - 1],
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Back control
                Constraint::Length(3), // Title input
                Constraint::Length(4), // Color swatches
                Constraint::Length(3), // Submit button
                Constraint::Length(1), // Validation message
                Constraint::Min(0),
            ])
            .split(area);

        self.render_back(frame, chunks[0]);
        self.title.render(frame, chunks[1]);
        self.render_swatches(frame, chunks[2]);
        self.render_submit(frame, chunks[3]);

        if let Some(error) = &self.error {
            let paragraph = Paragraph::new(error.as_str()).style(Style::default().fg(theme::ERROR));
            frame.render_widget(paragraph, chunks[4]);
        }
    }

    fn render_back(&self, frame: &mut Frame, area: Rect) {
        let style = if self.focus == FormField::Back {
            Style::default().fg(Color::Black).bg(theme::PRIMARY)
        } else {
            Style::default().fg(Color::White)
        };
        frame.render_widget(Paragraph::new(Span::styled("← Back", style)), area);
    }

    fn render_swatches(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Color")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::focused_border(self.focus == FormField::Color));

        let mut swatches = Vec::with_capacity(TaskColor::ALL.len() * 2);
        for color in TaskColor::ALL {
            let marker = if color == self.color { " ✓ " } else { "   " };
            swatches.push(Span::styled(
                marker,
                Style::default()
                    .bg(theme::task_color(color))
                    .fg(theme::swatch_foreground(color))
                    .add_modifier(Modifier::BOLD),
            ));
            swatches.push(Span::raw(" "));
        }

        let lines = vec![
            Line::from(swatches),
            Line::from(Span::styled(
                self.color.token(),
                Style::default().fg(theme::MUTED),
            )),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_submit(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == FormField::Submit;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::focused_border(focused));

        let style = if focused {
            Style::default()
                .fg(Color::White)
                .bg(theme::PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let paragraph = Paragraph::new(self.submit_label())
            .block(block)
            .style(style)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}
