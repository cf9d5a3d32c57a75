use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::adapters::tui::theme;
use crate::domain::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Modal alert; any key dismisses it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let (title, color) = match self.kind {
            NotificationKind::Success => ("Done", theme::SUCCESS),
            NotificationKind::Error => ("Error", theme::ERROR),
        };

        let body = vec![
            Line::from(self.message.as_str()),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to continue",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        render_popup(frame, title, color, body);
    }
}

/// Delete confirmation for one task.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDelete {
    pub task: Task,
}

impl ConfirmDelete {
    pub const PROMPT: &'static str = "Are you sure you want to delete this task?";

    pub fn new(task: Task) -> Self {
        Self { task }
    }

    pub fn render(&self, frame: &mut Frame) {
        let body = vec![
            Line::from(Self::PROMPT),
            Line::from(Span::styled(
                self.task.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Style::default().fg(theme::ERROR)),
                Span::raw(": delete  "),
                Span::styled("n", Style::default().fg(theme::PRIMARY)),
                Span::raw(": cancel"),
            ]),
        ];

        render_popup(frame, "Delete task", theme::ERROR, body);
    }
}

fn render_popup(frame: &mut Frame, title: &str, border: Color, body: Vec<Line>) {
    let popup_area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));

    let paragraph = Paragraph::new(body)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
